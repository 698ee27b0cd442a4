//! User directory service: registration, login, lookup and profile updates

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::user::{
    validate_password, validate_username, NewUser, User, UserId, UserRepository, UserStatus,
};
use crate::domain::{DomainError, UserValidationError};
use crate::infrastructure::observability::record_user_operation;

use super::token::{constant_time_compare, TokenGenerator};

/// Request for registering a new user
///
/// Username and password are optional here so that a missing field is
/// reported as invalid input rather than rejected by the deserializer.
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Credentials presented at login
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Profile changes; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Service owning the user lifecycle
///
/// Every operation is one read-then-write unit against the repository.
/// Username uniqueness is pre-checked here and enforced again by the
/// repository at write time, so a lost race still surfaces as a conflict.
#[derive(Debug)]
pub struct UserDirectory<R: UserRepository, G: TokenGenerator> {
    repository: Arc<R>,
    tokens: Arc<G>,
}

impl<R: UserRepository, G: TokenGenerator> UserDirectory<R, G> {
    /// Create a new user directory
    pub fn new(repository: Arc<R>, tokens: Arc<G>) -> Self {
        Self { repository, tokens }
    }

    /// List all users in store order
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        observe("list", self.repository.list().await)
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        observe("get", self.find(id).await)
    }

    /// Register a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        observe("create", self.try_create(request).await)
    }

    /// Authenticate with username and password, marking the user online
    pub async fn login(&self, request: LoginRequest) -> Result<User, DomainError> {
        observe("login", self.try_login(request).await)
    }

    /// Change username and/or birthday of the user owning `token`
    pub async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
        token: Option<&str>,
    ) -> Result<User, DomainError> {
        observe("update", self.try_update(id, request, token).await)
    }

    async fn find(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User with ID {} was not found", id)))
    }

    async fn try_create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let username = validate_username(request.username.as_deref())?.to_string();
        let password = validate_password(request.password.as_deref())?.to_string();

        self.ensure_username_available(&username).await?;

        let token = self.tokens.generate();
        let user = self
            .repository
            .create(NewUser::new(request.name, username, password, token))
            .await?;

        debug!(user_id = %user.id(), username = %user.username(), "Created user");

        Ok(user)
    }

    async fn try_login(&self, request: LoginRequest) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .get_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "User with username {} was not found",
                    request.username
                ))
            })?;

        if !constant_time_compare(user.password(), &request.password) {
            warn!(user_id = %user.id(), "Rejected login with wrong password");
            return Err(DomainError::unauthorized("Wrong password"));
        }

        user.set_status(UserStatus::Online);
        let user = self.repository.update(&user).await?;

        debug!(user_id = %user.id(), "User logged in");

        Ok(user)
    }

    async fn try_update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
        token: Option<&str>,
    ) -> Result<User, DomainError> {
        let mut user = self.find(id).await?;

        let authorized = token
            .map(|token| constant_time_compare(user.token(), token))
            .unwrap_or(false);

        if !authorized {
            warn!(user_id = %id, token_present = token.is_some(), "Rejected profile update");
            return Err(DomainError::forbidden(
                "You are not allowed to modify this profile",
            ));
        }

        if let Some(username) = request.username {
            if username != user.username() {
                if username.is_empty() {
                    return Err(UserValidationError::EmptyUsername.into());
                }

                self.ensure_username_available(&username).await?;
                user.set_username(username);
            }
        }

        if let Some(birthday) = request.birthday {
            user.set_birthday(birthday);
        }

        self.repository.update(&user).await?;

        let refreshed = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::internal(format!("User update failed for ID {}", id)))?;

        debug!(user_id = %id, username = %refreshed.username(), "Updated user profile");

        Ok(refreshed)
    }

    async fn ensure_username_available(&self, username: &str) -> Result<(), DomainError> {
        if self.repository.username_exists(username).await? {
            return Err(DomainError::conflict(format!(
                "Username {} is already taken",
                username
            )));
        }

        Ok(())
    }
}

fn observe<T>(operation: &'static str, result: Result<T, DomainError>) -> Result<T, DomainError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    };

    record_user_operation(operation, outcome);
    result
}
