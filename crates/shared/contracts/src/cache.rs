//! Cache entry shapes. Expiry and invalidation belong to the cache layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::{JobStatus, User, VideoJob};

use crate::jobs::download_url;

/// Cache key prefix for job summaries
pub const CACHE_PREFIX_JOB: &str = "job:";

/// Cache key prefix for user summaries
pub const CACHE_PREFIX_USER: &str = "user:";

/// Cached job summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedJob {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl CachedJob {
    pub fn cache_key(job_id: Uuid) -> String {
        format!("{}{}", CACHE_PREFIX_JOB, job_id)
    }

    pub fn key(&self) -> String {
        Self::cache_key(self.job_id)
    }
}

impl From<&VideoJob> for CachedJob {
    fn from(job: &VideoJob) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            filename: job.filename.clone(),
            created_at: job.created_at,
            completed_at: job.completed_at,
            download_url: download_url(job),
        }
    }
}

/// Cached user summary. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

impl CachedUser {
    pub fn cache_key(user_id: Uuid) -> String {
        format!("{}{}", CACHE_PREFIX_USER, user_id)
    }

    pub fn key(&self) -> String {
        Self::cache_key(self.user_id)
    }
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
