//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL migrator recording applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration inside a transaction; returns false if already applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)",
        )
        .bind(migration.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open transaction: {}", e)))?;

        // Raw SQL uses the simple query protocol, which allows several statements
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to commit migration {}: {}",
                migration.version, e
            ))
        })?;

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to get migration version: {}", e))
            })?;

        Ok(version)
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, applied in ascending order
    pub version: i64,
    /// Human-readable description
    pub description: &'static str,
    /// SQL to run when applying the migration
    pub up: &'static str,
}

impl Migration {
    pub const fn new(version: i64, description: &'static str, up: &'static str) -> Self {
        Self {
            version,
            description,
            up,
        }
    }
}

/// Schema for the user directory
pub fn user_migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "Create users table",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            token TEXT NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'ONLINE',
            creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            birthday DATE,
            CONSTRAINT users_username_key UNIQUE (username),
            CONSTRAINT users_token_key UNIQUE (token),
            CONSTRAINT users_status_check CHECK (status IN ('ONLINE', 'OFFLINE'))
        );
        "#,
    )]
}

/// Runs all pending migrations, returning how many were applied
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = 0;

    for migration in user_migrations() {
        if migrator.run_migration(&migration).await? {
            info!(
                version = migration.version,
                description = migration.description,
                "Applied migration"
            );
            applied += 1;
        }
    }

    let version = migrator.current_version().await?;
    info!(applied, version = ?version, "Database schema up to date");

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "Test migration", "CREATE TABLE test");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.description, "Test migration");
        assert_eq!(migration.up, "CREATE TABLE test");
    }

    #[test]
    fn test_user_migrations_order() {
        let migrations = user_migrations();

        assert!(!migrations.is_empty());

        for pair in migrations.windows(2) {
            assert!(
                pair[1].version > pair[0].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_users_table_enforces_unique_username() {
        let migrations = user_migrations();
        let create_users = &migrations[0];

        assert!(create_users.up.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(create_users.up.contains("UNIQUE (username)"));
        assert!(create_users.up.contains("UNIQUE (token)"));
    }
}
