//! Commands module - CLI command implementations.
//!
//! Commands talk to the database only through [`SchemaAdmin`](crate::infra::SchemaAdmin).

pub mod migrate;
pub mod ping;
