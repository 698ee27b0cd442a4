//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserRepository, UserStatus};
use crate::domain::DomainError;

const USERNAME_CONSTRAINT: &str = "users_username_key";

const USER_COLUMNS: &str =
    "id, name, username, password, token, status, creation_date, birthday";

/// PostgreSQL implementation of UserRepository
///
/// Relies on the `users` table created by the storage migrations, whose
/// unique index on `username` backs the write-time conflict check.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, username, password, token, status, creation_date, birthday)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user.name())
        .bind(user.username())
        .bind(user.password())
        .bind(user.token())
        .bind(user.status().as_str())
        .bind(user.creation_date())
        .bind(user.birthday())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, user.username(), "create"))?;

        Ok(user.into_user(UserId::new(id)))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, status = $3, birthday = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id().value())
        .bind(user.username())
        .bind(user.status().as_str())
        .bind(user.birthday())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, user.username(), "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User with ID {} was not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }
}

fn map_write_error(err: sqlx::Error, username: &str, action: &str) -> DomainError {
    let violated = err
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.constraint().map(str::to_string));

    match violated {
        Some(constraint) => unique_violation(constraint.as_deref(), username, action),
        None => DomainError::storage(format!("Failed to {} user: {}", action, err)),
    }
}

/// Only the username index is a caller-visible conflict; anything else is a storage fault
fn unique_violation(constraint: Option<&str>, username: &str, action: &str) -> DomainError {
    match constraint {
        Some(USERNAME_CONSTRAINT) => {
            DomainError::conflict(format!("Username '{}' is already taken", username))
        }
        other => DomainError::storage(format!(
            "Failed to {} user: unique constraint {} violated",
            action,
            other.unwrap_or("<unknown>")
        )),
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: i64 = row.get("id");
    let name: Option<String> = row.get("name");
    let username: String = row.get("username");
    let password: String = row.get("password");
    let token: String = row.get("token");
    let status: String = row.get("status");
    let creation_date: DateTime<Utc> = row.get("creation_date");
    let birthday: Option<NaiveDate> = row.get("birthday");

    let status = UserStatus::parse(&status).ok_or_else(|| {
        DomainError::storage(format!("Invalid user status in database: {}", status))
    })?;

    let user = NewUser::new(name, username, password, token)
        .with_status(status)
        .with_creation_date(creation_date)
        .with_birthday(birthday)
        .into_user(UserId::new(id));

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_username_violation_is_conflict() {
        let err = unique_violation(Some("users_username_key"), "alice", "create");

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), "Username 'alice' is already taken");
    }

    #[test]
    fn test_token_violation_is_storage_error() {
        let err = unique_violation(Some("users_token_key"), "alice", "create");

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.message().contains("users_token_key"));
    }

    #[test]
    fn test_unnamed_violation_is_storage_error() {
        let err = unique_violation(None, "alice", "update");

        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_username_constraint_matches_schema() {
        let schema = crate::infrastructure::storage::user_migrations()[0].up;

        assert!(schema.contains(&format!("CONSTRAINT {} UNIQUE (username)", USERNAME_CONSTRAINT)));
    }
}
