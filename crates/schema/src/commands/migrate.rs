//! Migrate command - Database migration management.

use std::io::Write;

use common::{AppError, AppResult};

use crate::cli::MigrateAction;
use crate::infra::SchemaAdmin;

/// Execute the migrate command.
///
/// Status lines go to `out`; everything else is logged.
pub async fn execute(
    action: MigrateAction,
    admin: &dyn SchemaAdmin,
    out: &mut dyn Write,
) -> AppResult<()> {
    match action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            admin.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            tracing::warn!(steps, "Rolling back migrations...");
            admin.rollback_migrations(steps).await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            let status = admin.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "applied" } else { "pending" };
                writeln!(out, "{}: {}", name, marker)
                    .map_err(|e| AppError::internal(e.to_string()))?;
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            admin.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}
