//! Notification log domain entity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{
    DELIVERY_STATUS_FAILED, DELIVERY_STATUS_PENDING, DELIVERY_STATUS_SENT,
    NOTIFICATION_TYPE_FAILURE, NOTIFICATION_TYPE_SUCCESS,
};
use crate::error::{DomainError, DomainResult};
use crate::validation::validate;

/// Outcome the notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Failure,
}

impl NotificationType {
    pub const ALL: [NotificationType; 2] = [NotificationType::Success, NotificationType::Failure];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Success => NOTIFICATION_TYPE_SUCCESS,
            NotificationType::Failure => NOTIFICATION_TYPE_FAILURE,
        }
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::invalid_value("notification type", s))
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery state of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 3] = [
        DeliveryStatus::Pending,
        DeliveryStatus::Sent,
        DeliveryStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => DELIVERY_STATUS_PENDING,
            DeliveryStatus::Sent => DELIVERY_STATUS_SENT,
            DeliveryStatus::Failed => DELIVERY_STATUS_FAILED,
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::invalid_value("delivery status", s))
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification log entry (one row of `notification_log`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NotificationLog {
    pub notification_id: Uuid,
    pub job_id: Uuid,
    pub notification_type: NotificationType,
    #[validate(
        email(message = "Invalid recipient email address"),
        length(max = 255, message = "Recipient email must be at most 255 characters")
    )]
    pub recipient_email: String,
    pub delivery_status: DeliveryStatus,
    #[validate(range(min = 0, message = "Retry count cannot be negative"))]
    pub retry_count: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl NotificationLog {
    /// Record a successful delivery.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.delivery_status == DeliveryStatus::Sent {
            return Err(DomainError::invalid_transition(
                "notification",
                self.delivery_status,
                DeliveryStatus::Sent,
            ));
        }
        self.delivery_status = DeliveryStatus::Sent;
        self.sent_at = Some(at);
        self.error_message = None;
        Ok(())
    }

    /// Record a failed delivery attempt.
    pub fn mark_failed(&mut self, message: impl Into<String>) -> DomainResult<()> {
        if self.delivery_status == DeliveryStatus::Sent {
            return Err(DomainError::invalid_transition(
                "notification",
                self.delivery_status,
                DeliveryStatus::Failed,
            ));
        }
        self.delivery_status = DeliveryStatus::Failed;
        self.error_message = Some(message.into());
        Ok(())
    }

    /// Queue another delivery attempt.
    pub fn record_retry(&mut self) -> DomainResult<()> {
        if self.delivery_status != DeliveryStatus::Failed {
            return Err(DomainError::invalid_transition(
                "notification",
                self.delivery_status,
                DeliveryStatus::Pending,
            ));
        }
        self.retry_count = self
            .retry_count
            .checked_add(1)
            .ok_or_else(|| DomainError::validation("Retry count exceeds its maximum"))?;
        self.delivery_status = DeliveryStatus::Pending;
        self.error_message = None;
        Ok(())
    }

    /// Check field rules plus the state-dependent presence of optional fields.
    pub fn check_delivery_state(&self) -> DomainResult<()> {
        validate(self)?;

        if self.delivery_status != DeliveryStatus::Failed && self.error_message.is_some() {
            return Err(DomainError::validation(
                "Error message is only set on failed deliveries",
            ));
        }
        if self.delivery_status != DeliveryStatus::Sent && self.sent_at.is_some() {
            return Err(DomainError::validation(
                "Sent time is only set on delivered notifications",
            ));
        }
        Ok(())
    }
}

/// Validated input for logging a new notification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewNotification {
    pub job_id: Uuid,
    pub notification_type: NotificationType,
    #[validate(
        email(message = "Invalid recipient email address"),
        length(max = 255, message = "Recipient email must be at most 255 characters")
    )]
    pub recipient_email: String,
}

impl NewNotification {
    /// Validate and build notification input.
    pub fn new(
        job_id: Uuid,
        notification_type: NotificationType,
        recipient_email: impl Into<String>,
    ) -> DomainResult<Self> {
        let notification = Self {
            job_id,
            notification_type,
            recipient_email: recipient_email.into(),
        };
        validate(&notification)?;
        Ok(notification)
    }
}
