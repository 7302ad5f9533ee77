//! Upload and job API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::{JobStatus, VideoJob};

/// Default number of jobs per page
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Maximum allowed jobs per page
pub const MAX_PAGE_LIMIT: u64 = 100;

/// First page number (1-indexed)
pub const DEFAULT_PAGE: u64 = 1;

/// Highest page number; keeps the row offset within a PostgreSQL `bigint`
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_LIMIT;

/// Request for a pre-signed upload URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    #[validate(length(min = 1, max = 255, message = "Filename must be between 1 and 255 characters"))]
    pub filename: String,
    #[validate(length(min = 1, message = "Content type is required"))]
    pub content_type: String,
    /// Size in bytes
    #[validate(range(min = 1, message = "File size must be positive"))]
    pub file_size: u64,
}

/// Issued upload URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub video_id: String,
    /// URL lifetime in seconds
    pub expires_in: u64,
}

/// Request to create a job for an uploaded video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 1, message = "Video id is required"))]
    pub video_id: String,
    #[validate(length(min = 1, max = 255, message = "Filename must be between 1 and 255 characters"))]
    pub filename: String,
}

/// Created job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&VideoJob> for CreateJobResponse {
    fn from(job: &VideoJob) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            created_at: job.created_at,
        }
    }
}

/// One row of a job listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub job_id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Frame archive location, only for completed jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl From<&VideoJob> for JobSummary {
    fn from(job: &VideoJob) -> Self {
        Self {
            job_id: job.job_id,
            filename: job.filename.clone(),
            status: job.status,
            created_at: job.created_at,
            completed_at: job.completed_at,
            download_url: download_url(job),
        }
    }
}

/// Listing query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

impl ListJobsQuery {
    /// Page number, clamped to `DEFAULT_PAGE..=MAX_PAGE`
    pub fn page(&self) -> u64 {
        self.page.clamp(DEFAULT_PAGE, MAX_PAGE)
    }

    /// Page size capped at maximum, never zero
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    /// Zero-based page index for the database paginator
    pub fn page_index(&self) -> u64 {
        self.page() - 1
    }
}

impl Default for ListJobsQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            status: None,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit > 0 { total.div_ceil(limit) } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Page of a user's jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListJobsResponse {
    pub jobs: Vec<JobSummary>,
    pub pagination: Pagination,
}

impl ListJobsResponse {
    /// Build a listing page from jobs returned for `query`.
    pub fn from_page(jobs: &[VideoJob], query: &ListJobsQuery, total: u64) -> Self {
        Self {
            jobs: jobs.iter().map(JobSummary::from).collect(),
            pagination: Pagination::new(query.page(), query.limit(), total),
        }
    }
}

/// Full job record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct JobDetailResponse {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<VideoJob> for JobDetailResponse {
    fn from(job: VideoJob) -> Self {
        Self {
            job_id: job.job_id,
            user_id: job.user_id,
            filename: job.filename,
            status: job.status,
            video_url: job.video_url,
            result_url: job.result_url,
            frame_count: job.frame_count,
            error_message: job.error_message,
            created_at: job.created_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
        }
    }
}

pub(crate) fn download_url(job: &VideoJob) -> Option<String> {
    match job.status {
        JobStatus::Completed => job.result_url.clone(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(status: JobStatus) -> VideoJob {
        VideoJob {
            job_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            filename: "video.mp4".to_string(),
            status,
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
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).total_pages, 2);
        assert_eq!(Pagination::new(1, 0, 5).total_pages, 0);
    }

    #[test]
    fn test_query_bounds() {
        let query = ListJobsQuery {
            page: 0,
            limit: 1000,
            status: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_index(), 0);
        assert_eq!(query.limit(), MAX_PAGE_LIMIT);

        let query: ListJobsQuery = serde_json::from_value(json!({ "status": "failed" })).unwrap();
        assert_eq!(query.page, DEFAULT_PAGE);
        assert_eq!(query.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(query.status, Some(JobStatus::Failed));
    }

    #[test]
    fn test_huge_page_keeps_offset_in_range() {
        let query: ListJobsQuery =
            serde_json::from_value(json!({ "page": u64::MAX, "limit": 100 })).unwrap();
        assert_eq!(query.page(), MAX_PAGE);

        let offset = query
            .page_index()
            .checked_mul(query.limit())
            .expect("offset overflowed");
        assert!(offset <= i64::MAX as u64);
    }

    #[test]
    fn test_summary_download_url_only_when_completed() {
        let mut completed = job(JobStatus::Completed);
        completed.result_url = Some("https://cdn.example.com/frames.zip".to_string());
        assert_eq!(
            JobSummary::from(&completed).download_url.as_deref(),
            Some("https://cdn.example.com/frames.zip")
        );

        let mut failed = job(JobStatus::Failed);
        failed.error_message = Some("boom".to_string());
        assert!(JobSummary::from(&failed).download_url.is_none());
    }

    #[test]
    fn test_detail_omits_absent_fields() {
        let json = serde_json::to_value(JobDetailResponse::from(job(JobStatus::Pending))).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["videoUrl"], "https://cdn.example.com/video.mp4");
        assert!(json.get("resultUrl").is_none());
        assert!(json.get("startedAt").is_none());
    }

    #[test]
    fn test_listing_page() {
        let jobs = vec![job(JobStatus::Pending), job(JobStatus::Processing)];
        let query = ListJobsQuery {
            page: 2,
            limit: 2,
            status: None,
        };
        let response = ListJobsResponse::from_page(&jobs, &query, 5);
        assert_eq!(response.jobs.len(), 2);
        assert_eq!(response.pagination.total_pages, 3);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["pagination"]["totalPages"], 3);
    }
}
