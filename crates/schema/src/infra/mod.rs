//! Infrastructure layer - database connection and migrations.

mod db;
pub mod migrations;

pub use db::{Database, SchemaAdmin};
pub use migrations::Migrator;

#[cfg(any(test, feature = "test-utils"))]
pub use db::MockSchemaAdmin;
