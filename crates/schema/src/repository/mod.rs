//! Repository layer for data access.

pub mod entities;
pub(crate) mod notification_repository;
pub(crate) mod user_repository;
pub(crate) mod video_job_repository;

pub use notification_repository::{NotificationRepository, NotificationStore};
pub use user_repository::{UserRepository, UserStore};
pub use video_job_repository::{VideoJobRepository, VideoJobStore};

#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use video_job_repository::MockVideoJobRepository;
