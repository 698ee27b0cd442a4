//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, User, UserId, UserRepository};
use crate::infrastructure::user::{
    CreateUserRequest, LoginRequest, TokenGenerator, UpdateUserRequest, UserDirectory,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_directory: Arc<dyn UserDirectoryService>,
}

impl AppState {
    pub fn new(user_directory: Arc<dyn UserDirectoryService>) -> Self {
        Self { user_directory }
    }
}

/// Trait for user directory operations
#[async_trait::async_trait]
pub trait UserDirectoryService: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn get(&self, id: UserId) -> Result<User, DomainError>;
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn login(&self, request: LoginRequest) -> Result<User, DomainError>;
    async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
        token: Option<&str>,
    ) -> Result<User, DomainError>;
}

#[async_trait::async_trait]
impl<R, G> UserDirectoryService for UserDirectory<R, G>
where
    R: UserRepository + 'static,
    G: TokenGenerator + 'static,
{
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserDirectory::list(self).await
    }

    async fn get(&self, id: UserId) -> Result<User, DomainError> {
        UserDirectory::get(self, id).await
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserDirectory::create(self, request).await
    }

    async fn login(&self, request: LoginRequest) -> Result<User, DomainError> {
        UserDirectory::login(self, request).await
    }

    async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
        token: Option<&str>,
    ) -> Result<User, DomainError> {
        UserDirectory::update(self, id, request, token).await
    }
}
