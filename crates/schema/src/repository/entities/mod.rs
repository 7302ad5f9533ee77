//! SeaORM entities, one per table.

pub mod notification_log;
pub mod user;
pub mod video_job;
