//! Migrate command - applies the PostgreSQL schema and exits

use anyhow::Context;
use tracing::info;

use crate::config::StorageConfig;
use crate::infrastructure::storage::{connect_pool, run_migrations};

/// Apply pending migrations against the configured database
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let postgres = postgres_settings(&config.storage)?;

    let pool = connect_pool(&postgres).await?;
    let applied = run_migrations(&pool).await?;

    info!(applied, "Migrations complete");
    pool.close().await;

    Ok(())
}

fn postgres_settings(
    storage: &StorageConfig,
) -> anyhow::Result<crate::infrastructure::storage::PostgresConfig> {
    storage
        .postgres()
        .context("storage.database_url must be set to run migrations")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_database_url() {
        let err = postgres_settings(&StorageConfig::default()).unwrap_err();
        assert!(err.to_string().contains("database_url"));
    }

    #[test]
    fn test_uses_configured_url() {
        let storage = StorageConfig {
            database_url: Some("postgres://db/users".to_string()),
            ..Default::default()
        };

        assert_eq!(postgres_settings(&storage).unwrap().url, "postgres://db/users");
    }
}
