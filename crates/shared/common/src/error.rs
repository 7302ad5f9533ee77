//! Unified application error.
//!
//! Storage errors are carried unchanged in [`AppError::Database`]; callers
//! that need to know which constraint fired ask
//! [`AppError::constraint_violation`] instead of matching on driver text.

use contracts::ErrorResponse;
use domain::DomainError;
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidState(String),

    // Storage
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stored value the domain model does not recognise
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Which kind of storage constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl ConstraintKind {
    /// Classify a PostgreSQL SQLSTATE code.
    pub fn from_sqlstate(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(ConstraintKind::Unique),
            "23503" => Some(ConstraintKind::ForeignKey),
            "23514" => Some(ConstraintKind::Check),
            "23502" => Some(ConstraintKind::NotNull),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign_key",
            ConstraintKind::Check => "check",
            ConstraintKind::NotNull => "not_null",
        }
    }
}

/// Constraint violation reported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    /// Constraint name when the driver reports one
    pub constraint: Option<String>,
}

impl ConstraintViolation {
    pub fn is(&self, kind: ConstraintKind) -> bool {
        self.kind == kind
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.constraint.as_deref() == Some(name)
    }
}

#[cfg(feature = "database")]
fn driver_error(err: &sea_orm::DbErr) -> Option<&(dyn sea_orm::sqlx::error::DatabaseError + 'static)> {
    use sea_orm::sqlx;
    use sea_orm::{DbErr, RuntimeErr};

    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Conn(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => Some(e.as_ref()),
        _ => None,
    }
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            #[cfg(feature = "database")]
            AppError::Database(_) => match self.constraint_violation().map(|v| v.kind) {
                Some(ConstraintKind::Unique) => "CONFLICT",
                Some(_) => "CONSTRAINT_VIOLATION",
                None => "DATABASE_ERROR",
            },
            AppError::CorruptRow(_) => "DATA_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status a service should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound => 404,
            AppError::InvalidState(_) => 409,
            AppError::Validation(_) => 400,
            #[cfg(feature = "database")]
            AppError::Database(_) => match self.constraint_violation().map(|v| v.kind) {
                Some(ConstraintKind::Unique) => 409,
                Some(_) => 422,
                None => 500,
            },
            _ => 500,
        }
    }

    /// Classify a storage constraint violation, if this is one.
    ///
    /// The underlying error is left untouched.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(err) => {
                let db_err = driver_error(err)?;
                let kind = ConstraintKind::from_sqlstate(&db_err.code()?)?;
                Some(ConstraintViolation {
                    kind,
                    constraint: db_err.constraint().map(str::to_string),
                })
            }
            _ => None,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::InvalidState(msg) => msg.clone(),

            #[cfg(feature = "database")]
            AppError::Database(e) => match self.constraint_violation() {
                Some(violation) if violation.is(ConstraintKind::Unique) => {
                    "Resource already exists".to_string()
                }
                Some(_) => "Request violates a data constraint".to_string(),
                None => {
                    tracing::error!("Database error: {:?}", e);
                    "A database error occurred".to_string()
                }
            },
            AppError::CorruptRow(msg) => {
                tracing::error!("Corrupt row: {}", msg);
                "A data error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Shared error body for this error.
    pub fn to_response(&self, request_id: impl Into<String>) -> ErrorResponse {
        let response = ErrorResponse::new(self.code(), self.user_message(), request_id);
        match self.constraint_violation() {
            Some(violation) => response.with_details(json!({
                "constraint": violation.constraint,
                "kind": violation.kind.as_str(),
            })),
            None => response,
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            err @ DomainError::InvalidEnumValue { .. } => AppError::Validation(err.to_string()),
            err @ DomainError::InvalidTransition { .. } => AppError::InvalidState(err.to_string()),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn corrupt_row(msg: impl Into<String>) -> Self {
        AppError::CorruptRow(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlstate_classification() {
        assert_eq!(ConstraintKind::from_sqlstate("23505"), Some(ConstraintKind::Unique));
        assert_eq!(ConstraintKind::from_sqlstate("23503"), Some(ConstraintKind::ForeignKey));
        assert_eq!(ConstraintKind::from_sqlstate("23514"), Some(ConstraintKind::Check));
        assert_eq!(ConstraintKind::from_sqlstate("23502"), Some(ConstraintKind::NotNull));
        assert_eq!(ConstraintKind::from_sqlstate("40001"), None);
    }

    #[test]
    fn test_domain_errors_map_to_client_errors() {
        let err: AppError = DomainError::validation("Invalid email address").into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.user_message(), "Invalid email address");

        let err: AppError = DomainError::invalid_value("job status", "archived").into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.user_message(), "Invalid job status: archived");

        let err: AppError = DomainError::invalid_transition("video job", "completed", "processing").into();
        assert_eq!(err.code(), "INVALID_STATE");
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::internal("pool exhausted at 10.0.0.3");
        assert_eq!(err.user_message(), "An internal error occurred");
        assert!(err.constraint_violation().is_none());
    }

    #[test]
    fn test_to_response() {
        let response = AppError::NotFound.to_response("req-42");
        assert_eq!(response.error.code, "NOT_FOUND");
        assert_eq!(response.error.message, "Resource not found");
        assert_eq!(response.error.request_id, "req-42");
        assert!(response.error.details.is_none());
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_non_driver_database_error_is_not_a_violation() {
        let err = AppError::from(sea_orm::DbErr::Custom("boom".to_string()));
        assert!(err.constraint_violation().is_none());
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("boom"));
    }
}
