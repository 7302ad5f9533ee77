//! Persistence layer of the video frame extraction system.
//!
//! Owns the PostgreSQL schema: SeaORM entities for `users`, `video_jobs` and
//! `notification_log`, the ordered migrations that create them, repositories
//! and a unit of work for atomic writes. The `schema` binary applies and
//! reverts migrations as a deployment step.

pub mod cli;
pub mod commands;
pub mod infra;
pub mod repository;
pub mod unit_of_work;

use std::io;

use common::{AppResult, DatabaseConfig};

use crate::cli::{Cli, Commands};

pub use infra::{Database, Migrator, SchemaAdmin};
pub use repository::{
    NotificationRepository, NotificationStore, UserRepository, UserStore, VideoJobRepository,
    VideoJobStore,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

/// Run a parsed command line against the configured database.
pub async fn run(cli: Cli) -> AppResult<()> {
    let mut config = DatabaseConfig::from_env();
    if let Some(url) = cli.database_url {
        config = config.with_url(url);
    }
    tracing::debug!(?config, "Loaded database configuration");

    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config).await?;

    match cli.command {
        Commands::Migrate(args) => {
            commands::migrate::execute(args.action, &db, &mut io::stdout()).await
        }
        Commands::Ping => commands::ping::execute(&db).await,
    }
}
