//! User Directory
//!
//! A small account service: registration, password login, lookup and
//! token-gated profile updates, backed by memory or PostgreSQL.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use self::config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::AppState;
use crate::config::StorageBackend;
use infrastructure::{
    storage::{connect_pool, run_migrations},
    user::{InMemoryUserRepository, PostgresUserRepository, RandomTokenGenerator, UserDirectory},
};
use tracing::info;

/// Create the application state with default configuration (in-memory store)
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let tokens = Arc::new(RandomTokenGenerator::new());

    let state = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory user store");
            let repository = Arc::new(InMemoryUserRepository::new());
            AppState::new(Arc::new(UserDirectory::new(repository, tokens)))
        }
        StorageBackend::Postgres => {
            let postgres = config
                .storage
                .postgres()
                .context("storage.database_url is required for the postgres backend")?;

            let pool = connect_pool(&postgres).await?;
            run_migrations(&pool).await?;

            info!("Using PostgreSQL user store");
            let repository = Arc::new(PostgresUserRepository::new(pool));
            AppState::new(Arc::new(UserDirectory::new(repository, tokens)))
        }
    };

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::CreateUserRequest;

    #[tokio::test]
    async fn test_default_state_uses_memory_store() {
        let state = create_app_state().await.unwrap();

        let user = state
            .user_directory
            .create(CreateUserRequest {
                name: None,
                username: Some("alice".to_string()),
                password: Some("pw1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(state.user_directory.get(user.id()).await.unwrap().username(), "alice");
    }

    #[tokio::test]
    async fn test_postgres_backend_requires_url() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;

        let result = create_app_state_with_config(&config).await;
        assert!(result.is_err());
    }
}
