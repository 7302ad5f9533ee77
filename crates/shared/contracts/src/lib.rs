//! Shared contracts between the API, worker and notification services.
//!
//! Purely structural: these types fix field names and optionality on the
//! wire (camelCase JSON, absent optionals omitted). Each consumer validates
//! what it receives; request types derive `Validate` for that purpose.

pub mod auth;
pub mod cache;
pub mod error;
pub mod jobs;
pub mod messages;
pub mod processing;

pub use auth::{
    AuthenticatedUser, JwtPayload, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, ValidateRequest, ValidateResponse,
};
pub use cache::{CachedJob, CachedUser};
pub use error::{ErrorDetail, ErrorResponse};
pub use jobs::{
    CreateJobRequest, CreateJobResponse, JobDetailResponse, JobSummary, ListJobsQuery,
    ListJobsResponse, Pagination, UploadUrlRequest, UploadUrlResponse, MAX_PAGE,
};
pub use messages::{NotificationMessage, VideoEventMessage, VideoEventType, VideoProcessingMessage};
pub use processing::{FrameInfo, FrameManifest, ProcessingContext, ProcessingResult, Resolution};
