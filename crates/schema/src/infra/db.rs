//! Database connection and initialization.

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder, Statement,
};
use sea_orm_migration::{seaql_migrations, MigrationName, MigratorTrait};

use common::DatabaseConfig;

use super::migrations::Migrator;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Schema administration used by the migration CLI.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SchemaAdmin: Send + Sync {
    /// Apply every pending migration in order
    async fn run_migrations(&self) -> Result<(), DbErr>;

    /// Revert the most recent `steps` applied migrations
    async fn rollback_migrations(&self, steps: u32) -> Result<(), DbErr>;

    /// Every known migration with whether it is applied
    async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr>;

    /// Drop everything and re-apply all migrations
    async fn fresh_migrations(&self) -> Result<(), DbErr>;

    /// Round-trip a trivial query
    async fn ping(&self) -> Result<(), DbErr>;
}

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Initialize database connection and run migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;

        // Run pending migrations
        Migrator::up(&db.connection, None).await?;
        tracing::info!("Database connected and migrations applied");

        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout())
            .sqlx_logging(config.sqlx_logging);

        tracing::debug!(url = %config.redacted_url(), "Connecting to database");
        let connection = SeaDatabase::connect(options).await?;
        Ok(Self { connection })
    }

    /// Wrap an existing connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Roll back the last `steps` migrations, or all of them when `None`.
    pub async fn rollback_migrations(&self, steps: Option<u32>) -> Result<(), DbErr> {
        Migrator::down(&self.connection, steps).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let applied: HashSet<String> = if self.has_migration_table().await? {
            seaql_migrations::Entity::find()
                .order_by_asc(seaql_migrations::Column::Version)
                .all(&self.connection)
                .await?
                .into_iter()
                .map(|m| m.version)
                .collect()
        } else {
            HashSet::new()
        };

        // Map all defined migrations with their applied status
        let migrations = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }

    async fn has_migration_table(&self) -> Result<bool, DbErr> {
        let row = self
            .connection
            .query_one(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT to_regclass('seaql_migrations') IS NOT NULL AS present".to_string(),
            ))
            .await?;
        match row {
            Some(row) => row.try_get("", "present"),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SchemaAdmin for Database {
    async fn run_migrations(&self) -> Result<(), DbErr> {
        Database::run_migrations(self).await
    }

    async fn rollback_migrations(&self, steps: u32) -> Result<(), DbErr> {
        Database::rollback_migrations(self, Some(steps)).await
    }

    async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        Database::migration_status(self).await
    }

    async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Database::fresh_migrations(self).await
    }

    async fn ping(&self) -> Result<(), DbErr> {
        Database::ping(self).await
    }
}
