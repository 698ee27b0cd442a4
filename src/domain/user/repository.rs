//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations assign ids on create and must make a write visible to
/// every read that follows it. Username uniqueness is enforced at write time
/// and reported as [`DomainError::Conflict`].
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their username (for login and uniqueness checks)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user, assigning its id
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Persist changes to an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Check if a username exists
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }
}
