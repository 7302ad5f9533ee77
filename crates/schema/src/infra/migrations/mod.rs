//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}
//! and are applied in the order listed below.

use sea_orm_migration::prelude::*;

mod m20231114_000001_create_users_table;
mod m20231114_000002_create_video_jobs_table;
mod m20231114_000003_create_notification_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20231114_000001_create_users_table::Migration),
            Box::new(m20231114_000002_create_video_jobs_table::Migration),
            Box::new(m20231114_000003_create_notification_log_table::Migration),
        ]
    }
}

/// Render `ALTER TABLE .. ADD CONSTRAINT .. CHECK (condition)`.
///
/// CHECK constraints go through raw SQL so they carry a stable name that a
/// later `down` can drop.
fn check(table: &str, constraint: &str, condition: &str) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} CHECK ({})",
        table, constraint, condition
    )
}

fn check_in(table: &str, constraint: &str, column: &str, allowed: &[&str]) -> String {
    let values = allowed
        .iter()
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(", ");
    check(table, constraint, &format!("{} IN ({})", column, values))
}

fn check_non_negative(table: &str, constraint: &str, column: &str) -> String {
    check(table, constraint, &format!("{} >= 0", column))
}

fn check_not_empty(table: &str, constraint: &str, column: &str) -> String {
    check(table, constraint, &format!("{} <> ''", column))
}

/// SQL string literal
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn drop_constraint(table: &str, constraint: &str) -> String {
    format!("ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}", table, constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "m20231114_000001_create_users_table",
                "m20231114_000002_create_video_jobs_table",
                "m20231114_000003_create_notification_log_table",
            ]
        );
    }

    #[test]
    fn test_check_in_sql() {
        assert_eq!(
            check_in("video_jobs", "chk_video_jobs_status", "status", &["pending", "failed"]),
            "ALTER TABLE video_jobs ADD CONSTRAINT chk_video_jobs_status \
             CHECK (status IN ('pending', 'failed'))"
        );
    }

    #[test]
    fn test_check_not_empty_sql() {
        assert_eq!(
            check_not_empty("video_jobs", "chk_video_jobs_filename", "filename"),
            "ALTER TABLE video_jobs ADD CONSTRAINT chk_video_jobs_filename CHECK (filename <> '')"
        );
    }

    #[test]
    fn test_quote_escapes_single_quotes() {
        assert_eq!(quote("o'clock"), "'o''clock'");
    }

    #[test]
    fn test_drop_constraint_sql() {
        assert_eq!(
            drop_constraint("notification_log", "chk_notification_log_type"),
            "ALTER TABLE notification_log DROP CONSTRAINT IF EXISTS chk_notification_log_type"
        );
    }
}
