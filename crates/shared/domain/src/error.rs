//! Domain-level errors.
//!
//! These errors represent rule violations caught before anything reaches
//! storage. They are independent of infrastructure concerns.

use thiserror::Error;

/// Domain-specific errors for rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown value for an enumerated field
    #[error("Invalid {field}: {value}")]
    InvalidEnumValue { field: &'static str, value: String },

    /// Lifecycle transition that the current state does not allow
    #[error("Cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create an invalid enum value error
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        DomainError::InvalidEnumValue {
            field,
            value: value.into(),
        }
    }

    /// Create an invalid transition error
    pub fn invalid_transition(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        DomainError::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
