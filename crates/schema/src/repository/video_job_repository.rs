//! Video job repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::video_job::{self, lifecycle_update, ActiveModel, Entity as VideoJobEntity};
use common::{AppError, AppResult};
use contracts::ListJobsQuery;
use domain::validation::validate;
use domain::{JobStatus, NewVideoJob, VideoJob};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Video job repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VideoJobRepository: Send + Sync {
    /// Insert a pending job for an existing user
    async fn create(&self, new_job: NewVideoJob) -> AppResult<VideoJob>;

    /// Find job by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VideoJob>>;

    /// One page of a user's jobs, newest first, with the total match count
    async fn list_by_user(
        &self,
        user_id: Uuid,
        query: ListJobsQuery,
    ) -> AppResult<(Vec<VideoJob>, u64)>;

    /// Number of a user's jobs, optionally in one status
    async fn count_by_user(&self, user_id: Uuid, status: Option<JobStatus>) -> AppResult<u64>;

    /// Persist lifecycle fields of an existing job
    async fn save(&self, job: VideoJob) -> AppResult<VideoJob>;
}

/// Concrete implementation of VideoJobRepository
pub struct VideoJobStore {
    db: DatabaseConnection,
}

impl VideoJobStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VideoJobRepository for VideoJobStore {
    async fn create(&self, new_job: NewVideoJob) -> AppResult<VideoJob> {
        create(&self.db, new_job).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VideoJob>> {
        find_by_id(&self.db, id).await
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        query: ListJobsQuery,
    ) -> AppResult<(Vec<VideoJob>, u64)> {
        list_by_user(&self.db, user_id, query).await
    }

    async fn count_by_user(&self, user_id: Uuid, status: Option<JobStatus>) -> AppResult<u64> {
        count_by_user(&self.db, user_id, status).await
    }

    async fn save(&self, job: VideoJob) -> AppResult<VideoJob> {
        save(&self.db, job).await
    }
}

fn user_filter(
    user_id: Uuid,
    status: Option<JobStatus>,
) -> sea_orm::Select<VideoJobEntity> {
    // user_id + status is covered by idx_jobs_user_status
    let select = VideoJobEntity::find().filter(video_job::Column::UserId.eq(user_id));
    match status {
        Some(status) => select.filter(video_job::Column::Status.eq(status.as_str())),
        None => select,
    }
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, new_job: NewVideoJob) -> AppResult<VideoJob> {
    validate(&new_job)?;

    let active_model = ActiveModel {
        job_id: Set(Uuid::new_v4()),
        user_id: Set(new_job.user_id),
        filename: Set(new_job.filename),
        status: Set(JobStatus::Pending.as_str().to_string()),
        video_url: Set(new_job.video_url),
        result_url: Set(None),
        frame_count: Set(None),
        error_message: Set(None),
        created_at: Set(chrono::Utc::now()),
        started_at: Set(None),
        completed_at: Set(None),
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    tracing::debug!(job_id = %model.job_id, user_id = %model.user_id, "Video job created");
    VideoJob::try_from(model)
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<VideoJob>> {
    VideoJobEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?
        .map(VideoJob::try_from)
        .transpose()
}

pub(crate) async fn list_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    query: ListJobsQuery,
) -> AppResult<(Vec<VideoJob>, u64)> {
    let paginator = user_filter(user_id, query.status)
        .order_by_desc(video_job::Column::CreatedAt)
        .paginate(db, query.limit());

    let total = paginator.num_items().await.map_err(AppError::from)?;
    let models = paginator
        .fetch_page(query.page_index())
        .await
        .map_err(AppError::from)?;

    let jobs = models
        .into_iter()
        .map(VideoJob::try_from)
        .collect::<AppResult<Vec<_>>>()?;
    Ok((jobs, total))
}

pub(crate) async fn count_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    status: Option<JobStatus>,
) -> AppResult<u64> {
    user_filter(user_id, status)
        .count(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn save<C: ConnectionTrait>(db: &C, job: VideoJob) -> AppResult<VideoJob> {
    job.check_lifecycle()?;

    match lifecycle_update(&job).update(db).await {
        Ok(model) => VideoJob::try_from(model),
        Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
        Err(e) => Err(AppError::from(e)),
    }
}
