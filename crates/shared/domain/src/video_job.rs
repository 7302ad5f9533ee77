//! Video job domain entity and lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{
    JOB_STATUS_COMPLETED, JOB_STATUS_FAILED, JOB_STATUS_PENDING, JOB_STATUS_PROCESSING,
};
use crate::error::{DomainError, DomainResult};
use crate::validation::validate;

/// Processing status of a video job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Every status, in lifecycle order
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => JOB_STATUS_PENDING,
            JobStatus::Processing => JOB_STATUS_PROCESSING,
            JobStatus::Completed => JOB_STATUS_COMPLETED,
            JobStatus::Failed => JOB_STATUS_FAILED,
        }
    }

    /// Completed and failed jobs never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::invalid_value("job status", s))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video job domain entity (one row of `video_jobs`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VideoJob {
    pub job_id: Uuid,
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Filename must be between 1 and 255 characters"))]
    pub filename: String,
    pub status: JobStatus,
    #[validate(length(min = 1, message = "Video URL is required"))]
    pub video_url: String,
    pub result_url: Option<String>,
    #[validate(range(min = 0, message = "Frame count cannot be negative"))]
    pub frame_count: Option<i32>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl VideoJob {
    /// Move a pending job into processing.
    pub fn start(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status != JobStatus::Pending {
            return Err(self.transition_error(JobStatus::Processing));
        }
        self.status = JobStatus::Processing;
        self.started_at = Some(at);
        Ok(())
    }

    /// Record a successful extraction.
    pub fn complete(
        &mut self,
        result_url: impl Into<String>,
        frame_count: i32,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status != JobStatus::Processing {
            return Err(self.transition_error(JobStatus::Completed));
        }
        if frame_count < 0 {
            return Err(DomainError::validation("Frame count cannot be negative"));
        }
        self.status = JobStatus::Completed;
        self.result_url = Some(result_url.into());
        self.frame_count = Some(frame_count);
        self.completed_at = Some(at);
        Ok(())
    }

    /// Record a failure. Jobs may fail before they ever start.
    pub fn fail(&mut self, message: impl Into<String>, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(self.transition_error(JobStatus::Failed));
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        self.completed_at = Some(at);
        Ok(())
    }

    /// Check field rules plus the state-dependent presence of optional fields.
    pub fn check_lifecycle(&self) -> DomainResult<()> {
        validate(self)?;

        if self.status != JobStatus::Completed
            && (self.result_url.is_some() || self.frame_count.is_some())
        {
            return Err(DomainError::validation(
                "Result URL and frame count are only set on completed jobs",
            ));
        }
        if self.status != JobStatus::Failed && self.error_message.is_some() {
            return Err(DomainError::validation(
                "Error message is only set on failed jobs",
            ));
        }
        if !self.status.is_terminal() && self.completed_at.is_some() {
            return Err(DomainError::validation(
                "Completion time is only set on finished jobs",
            ));
        }
        if self.status == JobStatus::Pending && self.started_at.is_some() {
            return Err(DomainError::validation(
                "Pending jobs cannot have a start time",
            ));
        }
        Ok(())
    }

    fn transition_error(&self, to: JobStatus) -> DomainError {
        DomainError::invalid_transition("video job", self.status, to)
    }
}

/// Validated input for creating a pending job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewVideoJob {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Filename must be between 1 and 255 characters"))]
    pub filename: String,
    #[validate(length(min = 1, message = "Video URL is required"))]
    pub video_url: String,
}

impl NewVideoJob {
    /// Validate and build job input.
    pub fn new(
        user_id: Uuid,
        filename: impl Into<String>,
        video_url: impl Into<String>,
    ) -> DomainResult<Self> {
        let job = Self {
            user_id,
            filename: filename.into(),
            video_url: video_url.into(),
        };
        validate(&job)?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_job() -> VideoJob {
        VideoJob {
            job_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            filename: "video.mp4".to_string(),
            status: JobStatus::Pending,
            video_url: "https://cdn.example.com/video.mp4".to_string(),
            result_url: None,
            frame_count: None,
            error_message: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("archived".parse::<JobStatus>().is_err());
        assert!("PENDING".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_full_success_lifecycle() {
        let mut job = pending_job();
        job.start(Utc::now()).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.started_at.is_some());
        job.check_lifecycle().unwrap();

        job.complete("https://cdn.example.com/frames.zip", 120, Utc::now())
            .unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.frame_count, Some(120));
        job.check_lifecycle().unwrap();
    }

    #[test]
    fn test_pending_job_can_fail() {
        let mut job = pending_job();
        job.fail("unsupported codec", Utc::now()).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("unsupported codec"));
        job.check_lifecycle().unwrap();
    }

    #[test]
    fn test_cannot_complete_pending_job() {
        let mut job = pending_job();
        let err = job.complete("url", 1, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(job.status, JobStatus::Pending);
    }

    #[test]
    fn test_terminal_jobs_are_frozen() {
        let mut job = pending_job();
        job.fail("boom", Utc::now()).unwrap();
        assert!(job.start(Utc::now()).is_err());
        assert!(job.fail("again", Utc::now()).is_err());
    }

    #[test]
    fn test_negative_frame_count_rejected() {
        let mut job = pending_job();
        job.start(Utc::now()).unwrap();
        assert!(job.complete("url", -1, Utc::now()).is_err());
    }

    #[test]
    fn test_lifecycle_rejects_misplaced_fields() {
        let mut job = pending_job();
        job.result_url = Some("https://cdn.example.com/frames.zip".to_string());
        assert!(job.check_lifecycle().is_err());

        let mut job = pending_job();
        job.error_message = Some("oops".to_string());
        assert!(job.check_lifecycle().is_err());

        let mut job = pending_job();
        job.started_at = Some(Utc::now());
        assert!(job.check_lifecycle().is_err());
    }

    #[test]
    fn test_new_job_validation() {
        let user_id = Uuid::new_v4();
        assert!(NewVideoJob::new(user_id, "video.mp4", "https://cdn.example.com/v.mp4").is_ok());
        assert!(NewVideoJob::new(user_id, "", "https://cdn.example.com/v.mp4").is_err());
        assert!(NewVideoJob::new(user_id, "video.mp4", "").is_err());
        assert!(NewVideoJob::new(user_id, "a".repeat(256), "https://x").is_err());
    }
}
