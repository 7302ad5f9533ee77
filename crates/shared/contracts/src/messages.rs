//! Queue message payloads exchanged between the API, worker and notifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::{JobStatus, NotificationType, VideoJob};

/// Processing queue: a job ready for frame extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProcessingMessage {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub video_url: String,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
}

impl VideoProcessingMessage {
    pub fn for_job(job: &VideoJob, timestamp: DateTime<Utc>) -> Self {
        Self {
            job_id: job.job_id,
            user_id: job.user_id,
            video_url: job.video_url.clone(),
            filename: job.filename.clone(),
            timestamp,
        }
    }
}

/// Outcome reported on the event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoEventType {
    Completed,
    Failed,
}

impl VideoEventType {
    /// Notification the outcome should trigger
    pub fn notification_type(&self) -> NotificationType {
        match self {
            VideoEventType::Completed => NotificationType::Success,
            VideoEventType::Failed => NotificationType::Failure,
        }
    }
}

/// Event queue: a job reached a terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEventMessage {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub event_type: VideoEventType,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl VideoEventMessage {
    /// Event for a finished job; `None` while the job is still pending or processing.
    pub fn for_job(job: &VideoJob, timestamp: DateTime<Utc>) -> Option<Self> {
        let event_type = match job.status {
            JobStatus::Completed => VideoEventType::Completed,
            JobStatus::Failed => VideoEventType::Failed,
            JobStatus::Pending | JobStatus::Processing => return None,
        };
        Some(Self {
            job_id: job.job_id,
            user_id: job.user_id,
            event_type,
            filename: job.filename.clone(),
            result_url: job.result_url.clone(),
            frame_count: job.frame_count,
            error_message: job.error_message.clone(),
            timestamp,
        })
    }
}

/// Notification queue: an email to deliver about a finished job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub recipient_email: String,
    pub notification_type: NotificationType,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NotificationMessage {
    pub fn from_event(event: &VideoEventMessage, recipient_email: impl Into<String>) -> Self {
        Self {
            job_id: event.job_id,
            user_id: event.user_id,
            recipient_email: recipient_email.into(),
            notification_type: event.event_type.notification_type(),
            filename: event.filename.clone(),
            result_url: event.result_url.clone(),
            error_message: event.error_message.clone(),
            timestamp: event.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(status: JobStatus) -> VideoJob {
        VideoJob {
            job_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            filename: "clip.mov".to_string(),
            status,
            video_url: "https://cdn.example.com/clip.mov".to_string(),
            result_url: None,
            frame_count: None,
            error_message: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_no_event_for_unfinished_jobs() {
        assert!(VideoEventMessage::for_job(&job(JobStatus::Pending), Utc::now()).is_none());
        assert!(VideoEventMessage::for_job(&job(JobStatus::Processing), Utc::now()).is_none());
    }

    #[test]
    fn test_failed_event_becomes_failure_notification() {
        let mut failed = job(JobStatus::Failed);
        failed.error_message = Some("corrupt container".to_string());

        let event = VideoEventMessage::for_job(&failed, Utc::now()).unwrap();
        assert_eq!(event.event_type, VideoEventType::Failed);

        let notification = NotificationMessage::from_event(&event, "a@example.com");
        assert_eq!(notification.notification_type, NotificationType::Failure);
        assert_eq!(notification.error_message.as_deref(), Some("corrupt container"));

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["notificationType"], "failure");
        assert_eq!(json["recipientEmail"], "a@example.com");
        assert!(json.get("resultUrl").is_none());
    }

    #[test]
    fn test_event_type_wire_format() {
        let mut completed = job(JobStatus::Completed);
        completed.result_url = Some("https://cdn.example.com/frames.zip".to_string());
        completed.frame_count = Some(42);

        let event = VideoEventMessage::for_job(&completed, Utc::now()).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "completed");
        assert_eq!(json["frameCount"], 42);
    }
}
