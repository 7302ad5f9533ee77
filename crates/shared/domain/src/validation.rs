//! Construction-time validation helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::constants::USERNAME_PATTERN;
use crate::error::{DomainError, DomainResult};

/// Compiled username pattern, shared by every validator that checks usernames.
pub static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(USERNAME_PATTERN).expect("username pattern is a valid regex"));

/// Run the derived validators and collapse failures into a `DomainError`.
pub fn validate<T: Validate>(value: &T) -> DomainResult<()> {
    value
        .validate()
        .map_err(|e| DomainError::Validation(first_message(&e)))
}

/// First validation message, ordered by field name so the result is stable.
pub fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .unwrap_or_else(|| "Validation failed".to_string())
}
