//! User entity and related types

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presence status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Online,
    Offline,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
        }
    }

    /// Parse the stored representation, returning `None` for unknown values
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ONLINE" => Some(Self::Online),
            "OFFLINE" => Some(Self::Offline),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully populated user that has not been persisted yet
///
/// Stores turn this into a [`User`] by assigning an id, so an id can never
/// originate from a client.
#[derive(Debug, Clone)]
pub struct NewUser {
    name: Option<String>,
    username: String,
    password: String,
    token: String,
    status: UserStatus,
    creation_date: DateTime<Utc>,
    birthday: Option<NaiveDate>,
}

impl NewUser {
    /// Create a new, online user stamped with the current time
    pub fn new(
        name: Option<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name,
            username: username.into(),
            password: password.into(),
            token: token.into(),
            status: UserStatus::Online,
            // Microsecond precision survives a round trip through TIMESTAMPTZ
            creation_date: Utc::now().trunc_subsecs(6),
            birthday: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub(crate) fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn with_creation_date(mut self, creation_date: DateTime<Utc>) -> Self {
        self.creation_date = creation_date;
        self
    }

    pub(crate) fn with_birthday(mut self, birthday: Option<NaiveDate>) -> Self {
        self.birthday = birthday;
        self
    }

    /// Attach the store-assigned id
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            username: self.username,
            password: self.password,
            token: self.token,
            status: self.status,
            creation_date: self.creation_date,
            birthday: self.birthday,
        }
    }
}

/// A persisted user account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Unique login name
    username: String,
    /// Plaintext credential - never exposed in serialization
    #[serde(skip_serializing)]
    password: String,
    /// Opaque credential authorizing profile updates
    #[serde(skip_serializing)]
    token: String,
    status: UserStatus,
    creation_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birthday: Option<NaiveDate>,
}

impl User {
    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    // Mutators. Id, name, password, token and creation date have none.

    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_birthday(&mut self, birthday: NaiveDate) {
        self.birthday = Some(birthday);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(id: i64, username: &str) -> User {
        NewUser::new(Some("Test Name".to_string()), username, "secret", "tok-123")
            .into_user(UserId::new(id))
    }

    #[test]
    fn test_user_id_display() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_user_status_strings() {
        assert_eq!(UserStatus::Online.as_str(), "ONLINE");
        assert_eq!(UserStatus::parse("OFFLINE"), Some(UserStatus::Offline));
        assert_eq!(UserStatus::parse("away"), None);
        assert_eq!(UserStatus::default(), UserStatus::Online);
    }

    #[test]
    fn test_user_status_serialization() {
        assert_eq!(
            serde_json::to_string(&UserStatus::Online).unwrap(),
            "\"ONLINE\""
        );
        let parsed: UserStatus = serde_json::from_str("\"OFFLINE\"").unwrap();
        assert_eq!(parsed, UserStatus::Offline);
    }

    #[test]
    fn test_new_user_defaults() {
        let before = Utc::now().trunc_subsecs(6);
        let user = create_test_user(1, "alice");

        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.username(), "alice");
        assert_eq!(user.name(), Some("Test Name"));
        assert_eq!(user.token(), "tok-123");
        assert_eq!(user.status(), UserStatus::Online);
        assert!(user.birthday().is_none());
        assert!(user.creation_date() >= before);
    }

    #[test]
    fn test_user_mutators() {
        let mut user = create_test_user(1, "alice");
        let birthday = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();

        user.set_username("alice2");
        user.set_birthday(birthday);
        user.set_status(UserStatus::Offline);

        assert_eq!(user.username(), "alice2");
        assert_eq!(user.birthday(), Some(birthday));
        assert_eq!(user.status(), UserStatus::Offline);
        assert_eq!(user.token(), "tok-123");
    }

    #[test]
    fn test_user_serialization_excludes_secrets() {
        let user = create_test_user(1, "alice");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("tok-123"));
        assert!(json.contains("\"creationDate\""));
        assert!(json.contains("\"status\":\"ONLINE\""));
    }
}
