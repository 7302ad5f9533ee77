//! Common utilities shared by every crate that touches storage.
//!
//! This crate provides:
//! - A unified application error with storage constraint classification
//! - Database configuration loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, ConstraintKind, ConstraintViolation};
