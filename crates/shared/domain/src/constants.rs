//! Domain-level constants.
//!
//! These constants define field bounds and the allowed values of the
//! enumerated columns. Storage-level constraints are built from the same values.

// =============================================================================
// Users
// =============================================================================

/// Minimum username length
pub const USERNAME_MIN_LENGTH: u32 = 3;

/// Maximum username length (matches the `varchar(50)` column)
pub const USERNAME_MAX_LENGTH: u32 = 50;

/// Allowed username characters
pub const USERNAME_PATTERN: &str = r"^[a-zA-Z0-9_]+$";

/// Maximum email length (matches the `varchar(255)` column)
pub const EMAIL_MAX_LENGTH: u32 = 255;

/// Maximum password hash length
pub const PASSWORD_HASH_MAX_LENGTH: u32 = 255;

// =============================================================================
// Video jobs
// =============================================================================

/// Maximum filename length (matches the `varchar(255)` column)
pub const FILENAME_MAX_LENGTH: u32 = 255;

/// Width of the enumerated status columns
pub const STATUS_MAX_LENGTH: u32 = 20;

pub const JOB_STATUS_PENDING: &str = "pending";
pub const JOB_STATUS_PROCESSING: &str = "processing";
pub const JOB_STATUS_COMPLETED: &str = "completed";
pub const JOB_STATUS_FAILED: &str = "failed";

// =============================================================================
// Notifications
// =============================================================================

pub const NOTIFICATION_TYPE_SUCCESS: &str = "success";
pub const NOTIFICATION_TYPE_FAILURE: &str = "failure";

pub const DELIVERY_STATUS_PENDING: &str = "pending";
pub const DELIVERY_STATUS_SENT: &str = "sent";
pub const DELIVERY_STATUS_FAILED: &str = "failed";

/// Initial retry count for a new notification
pub const DEFAULT_RETRY_COUNT: i32 = 0;
