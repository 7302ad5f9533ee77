//! Domain layer - Core records of the video-frame-extraction schema.
//!
//! This crate contains the entity records, their enumerations, and the
//! construction-time validators that run before any write reaches storage.
//! It has no infrastructure dependencies and is shared by every service.

pub mod constants;
pub mod error;
pub mod notification;
pub mod user;
pub mod validation;
pub mod video_job;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use notification::{DeliveryStatus, NewNotification, NotificationLog, NotificationType};
pub use user::{NewUser, User, UserUpdate};
pub use video_job::{JobStatus, NewVideoJob, VideoJob};
