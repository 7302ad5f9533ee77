//! Shared helpers for tests that run against a live PostgreSQL.
//!
//! Set `TEST_DATABASE_URL` to a disposable database; every test drops and
//! re-creates the schema. Without it the database tests skip.

#![allow(dead_code)]

use std::env;

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, ExecResult, Statement, Value};
use uuid::Uuid;

use common::{AppError, ConstraintViolation, DatabaseConfig};
use domain::{NewUser, NewVideoJob};
use schema::Database;

/// Iterations per property unless `PROPERTY_RUNS` says otherwise
pub const DEFAULT_PROPERTY_RUNS: usize = 25;

/// Connect to the test database and reset it to a freshly migrated schema.
///
/// Returns `None` when `TEST_DATABASE_URL` is unset.
pub async fn test_database() -> Option<Database> {
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let config = DatabaseConfig::default().with_url(url);
    let db = Database::connect_without_migrations(&config)
        .await
        .expect("failed to connect to TEST_DATABASE_URL");
    db.fresh_migrations()
        .await
        .expect("failed to migrate test database");
    Some(db)
}

pub fn property_runs() -> usize {
    env::var("PROPERTY_RUNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PROPERTY_RUNS)
}

/// Seeded generator; set `PROPERTY_SEED` to replay a failing run.
pub fn rng() -> StdRng {
    let seed = env::var("PROPERTY_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    eprintln!("PROPERTY_SEED={}", seed);
    StdRng::seed_from_u64(seed)
}

pub fn word(rng: &mut impl Rng, min: usize, max: usize) -> String {
    let len = rng.gen_range(min..=max);
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn lowercase_word(rng: &mut impl Rng, min: usize, max: usize) -> String {
    let len = rng.gen_range(min..=max);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Unique tag so generated names never collide within a run
fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}

pub fn random_new_user(rng: &mut impl Rng) -> NewUser {
    let username = format!("{}_{}", word(rng, 1, 20), tag());
    let email = format!(
        "{}@{}.example.com",
        username.to_lowercase(),
        lowercase_word(rng, 2, 12)
    );
    NewUser::new(username, email, format!("$argon2id$v=19${}", word(rng, 20, 60)))
        .expect("generated user must be valid")
}

pub fn random_filename(rng: &mut impl Rng) -> String {
    const EXTENSIONS: [&str; 5] = ["mp4", "mov", "mkv", "avi", "webm"];
    let ext = EXTENSIONS[rng.gen_range(0..EXTENSIONS.len())];
    format!("{}.{}", word(rng, 1, 40), ext)
}

pub fn random_new_job(rng: &mut impl Rng, user_id: Uuid) -> NewVideoJob {
    let filename = random_filename(rng);
    let video_url = format!("https://uploads.example.com/{}/{}", Uuid::new_v4(), filename);
    NewVideoJob::new(user_id, filename, video_url).expect("generated job must be valid")
}

/// A lowercase value outside `allowed`.
pub fn value_outside(rng: &mut impl Rng, allowed: &[&str]) -> String {
    loop {
        let candidate = lowercase_word(rng, 1, 20);
        if !allowed.contains(&candidate.as_str()) {
            return candidate;
        }
    }
}

/// Run a statement directly, bypassing every application-level check.
pub async fn execute_raw(
    db: &Database,
    sql: &str,
    values: Vec<Value>,
) -> Result<ExecResult, DbErr> {
    db.connection()
        .execute(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
        .await
}

/// Rows in `table` whose `column` equals `id`.
pub async fn count_where(db: &Database, table: &str, column: &str, id: Uuid) -> i64 {
    let sql = format!("SELECT COUNT(*) AS n FROM {} WHERE {} = $1", table, column);
    let row = db
        .connection()
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            &sql,
            [id.into()],
        ))
        .await
        .expect("count query failed")
        .expect("count returned no row");
    row.try_get("", "n").expect("count column missing")
}

pub async fn count_all(db: &Database, table: &str) -> i64 {
    let row = db
        .connection()
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            format!("SELECT COUNT(*) AS n FROM {}", table),
        ))
        .await
        .expect("count query failed")
        .expect("count returned no row");
    row.try_get("", "n").expect("count column missing")
}

/// The constraint violation carried by `err`; panics if there is none.
pub fn violation(err: AppError) -> ConstraintViolation {
    match err.constraint_violation() {
        Some(violation) => violation,
        None => panic!("expected a constraint violation, got {:?}", err),
    }
}

pub fn raw_violation(err: DbErr) -> ConstraintViolation {
    violation(AppError::from(err))
}
