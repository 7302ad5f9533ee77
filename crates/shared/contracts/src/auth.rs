//! Authentication API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::validation::USERNAME_REGEX;
use domain::User;

/// User registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must contain only alphanumeric characters and underscores"
        )
    )]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for RegisterResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Identity embedded in a login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    pub user: AuthenticatedUser,
}

/// Token validation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Token validation result. Identity is present only for valid tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ValidateResponse {
    pub fn valid(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            valid: true,
            user_id: Some(user_id),
            username: Some(username.into()),
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
            username: None,
        }
    }
}

/// Claims carried by issued tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtPayload {
    pub user_id: Uuid,
    pub username: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            username: "alice_1".to_string(),
            email: "a@example.com".to_string(),
            password: "SecurePass123!".to_string(),
        };
        assert!(request.validate().is_ok());

        let short = RegisterRequest {
            password: "short".to_string(),
            ..request.clone()
        };
        assert!(short.validate().is_err());

        let bad_name = RegisterRequest {
            username: "alice 1".to_string(),
            ..request
        };
        assert!(bad_name.validate().is_err());
    }

    #[test]
    fn test_invalid_validate_response_omits_identity() {
        let json = serde_json::to_value(ValidateResponse::invalid()).unwrap();
        assert_eq!(json, json!({ "valid": false }));
    }

    #[test]
    fn test_jwt_payload_field_names() {
        let user_id = Uuid::new_v4();
        let payload = JwtPayload {
            user_id,
            username: "alice_1".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["userId"], user_id.to_string());
        assert_eq!(json["iat"], 1_700_000_000);
    }
}
