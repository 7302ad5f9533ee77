//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainResult;
use crate::validation::{validate, USERNAME_REGEX};

/// User domain entity (one row of `users`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for registering a user.
///
/// Build through [`NewUser::new`]; the struct literal skips validation and
/// leaves enforcement to the storage constraints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewUser {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username must be between 3 and 50 characters"
        ),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must contain only alphanumeric characters and underscores"
        )
    )]
    pub username: String,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Password hash is required"
    ))]
    pub password_hash: String,
}

impl NewUser {
    /// Validate and build registration input.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> DomainResult<Self> {
        let user = Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        };
        validate(&user)?;
        Ok(user)
    }
}

/// Profile changes. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username must be between 3 and 50 characters"
        ),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must contain only alphanumeric characters and underscores"
        )
    )]
    pub username: Option<String>,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Password hash is required"
    ))]
    pub password_hash: Option<String>,
}

impl UserUpdate {
    /// Validate the provided fields.
    pub fn check(&self) -> DomainResult<()> {
        validate(self)
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}
