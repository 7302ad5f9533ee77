//! Migration ordering and reversibility against a live PostgreSQL.

mod support;

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use sea_orm_migration::SchemaManager;
use serial_test::serial;

use schema::Database;

const TABLES: [&str; 3] = ["users", "video_jobs", "notification_log"];

const INDEXES: [(&str, &str); 8] = [
    ("users", "idx_users_username"),
    ("users", "idx_users_email"),
    ("video_jobs", "idx_jobs_user_id"),
    ("video_jobs", "idx_jobs_status"),
    ("video_jobs", "idx_jobs_created_at"),
    ("video_jobs", "idx_jobs_user_status"),
    ("notification_log", "idx_notifications_job_id"),
    ("notification_log", "idx_notifications_status"),
];

const CONSTRAINTS: [&str; 12] = [
    "chk_users_username_length",
    "chk_users_username_format",
    "chk_users_password_hash",
    "chk_video_jobs_status",
    "chk_video_jobs_frame_count",
    "chk_video_jobs_filename",
    "chk_video_jobs_video_url",
    "fk_video_jobs_user",
    "chk_notification_log_type",
    "chk_notification_log_status",
    "chk_notification_log_retry_count",
    "fk_notification_log_job",
];

async fn has_table(db: &Database, table: &str) -> bool {
    SchemaManager::new(db.connection())
        .has_table(table)
        .await
        .expect("has_table failed")
}

async fn has_index(db: &Database, table: &str, index: &str) -> bool {
    SchemaManager::new(db.connection())
        .has_index(table, index)
        .await
        .expect("has_index failed")
}

async fn has_constraint(db: &Database, name: &str) -> bool {
    let row = db
        .connection()
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT COUNT(*) AS n FROM pg_constraint WHERE conname = $1",
            [name.into()],
        ))
        .await
        .expect("constraint lookup failed")
        .expect("constraint lookup returned no row");
    let n: i64 = row.try_get("", "n").expect("count column missing");
    n > 0
}

#[tokio::test]
#[serial]
async fn test_fresh_schema_has_every_object() {
    let Some(db) = support::test_database().await else { return };

    for table in TABLES {
        assert!(has_table(&db, table).await, "missing table {}", table);
    }
    for (table, index) in INDEXES {
        assert!(has_index(&db, table, index).await, "missing index {}", index);
    }
    for constraint in CONSTRAINTS {
        assert!(has_constraint(&db, constraint).await, "missing constraint {}", constraint);
    }
}

#[tokio::test]
#[serial]
async fn test_status_reports_all_applied_in_order() {
    let Some(db) = support::test_database().await else { return };

    let status = db.migration_status().await.unwrap();
    let names: Vec<&str> = status.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "m20231114_000001_create_users_table",
            "m20231114_000002_create_video_jobs_table",
            "m20231114_000003_create_notification_log_table",
        ]
    );
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[tokio::test]
#[serial]
async fn test_stepwise_rollback_removes_newest_first() {
    let Some(db) = support::test_database().await else { return };

    db.rollback_migrations(Some(1)).await.unwrap();
    assert!(!has_table(&db, "notification_log").await);
    assert!(has_table(&db, "video_jobs").await);
    assert!(!has_constraint(&db, "fk_notification_log_job").await);

    db.rollback_migrations(Some(1)).await.unwrap();
    assert!(!has_table(&db, "video_jobs").await);
    assert!(has_table(&db, "users").await);
    assert!(!has_constraint(&db, "chk_video_jobs_status").await);

    let status = db.migration_status().await.unwrap();
    let applied: Vec<bool> = status.iter().map(|(_, applied)| *applied).collect();
    assert_eq!(applied, vec![true, false, false]);
}

#[tokio::test]
#[serial]
async fn test_down_fully_reverses_up() {
    let Some(db) = support::test_database().await else { return };

    db.rollback_migrations(None).await.unwrap();

    for table in TABLES {
        assert!(!has_table(&db, table).await, "table {} survived rollback", table);
    }
    for constraint in CONSTRAINTS {
        assert!(!has_constraint(&db, constraint).await, "{} survived rollback", constraint);
    }
    for (_, index) in INDEXES {
        let row = db
            .connection()
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT COUNT(*) AS n FROM pg_indexes WHERE indexname = $1",
                [index.into()],
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 0, "index {} survived rollback", index);
    }
    assert!(db
        .migration_status()
        .await
        .unwrap()
        .iter()
        .all(|(_, applied)| !applied));

    db.run_migrations().await.unwrap();
    for table in TABLES {
        assert!(has_table(&db, table).await);
    }
    for constraint in CONSTRAINTS {
        assert!(has_constraint(&db, constraint).await);
    }
}

#[tokio::test]
#[serial]
async fn test_failed_migration_can_be_rerun() {
    let Some(db) = support::test_database().await else { return };

    db.rollback_migrations(Some(2)).await.unwrap();

    // Squat on an index name the video_jobs migration needs
    support::execute_raw(&db, "CREATE TABLE blocker (x integer)", vec![])
        .await
        .unwrap();
    support::execute_raw(&db, "CREATE INDEX idx_jobs_status ON blocker (x)", vec![])
        .await
        .unwrap();

    assert!(db.run_migrations().await.is_err());
    assert!(!has_table(&db, "video_jobs").await);
    assert!(!has_constraint(&db, "chk_video_jobs_status").await);

    let applied: Vec<bool> = db
        .migration_status()
        .await
        .unwrap()
        .iter()
        .map(|(_, applied)| *applied)
        .collect();
    assert_eq!(applied, vec![true, false, false]);

    support::execute_raw(&db, "DROP TABLE blocker", vec![])
        .await
        .unwrap();

    db.run_migrations().await.unwrap();
    for table in TABLES {
        assert!(has_table(&db, table).await, "missing table {}", table);
    }
    for (table, index) in INDEXES {
        assert!(has_index(&db, table, index).await, "missing index {}", index);
    }
}

#[tokio::test]
#[serial]
async fn test_up_is_idempotent() {
    let Some(db) = support::test_database().await else { return };

    db.run_migrations().await.unwrap();
    db.ping().await.unwrap();
    assert!(db
        .migration_status()
        .await
        .unwrap()
        .iter()
        .all(|(_, applied)| *applied));
}
