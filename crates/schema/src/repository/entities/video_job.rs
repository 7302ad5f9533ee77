//! Video job database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Unchanged, Set};

use common::AppError;
use domain::{JobStatus, VideoJob};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "video_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub video_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub result_url: Option<String>,
    pub frame_count: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    pub created_at: DateTimeUtc,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::notification_log::Entity")]
    Notifications,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::notification_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Fails only if the row holds a status the domain does not know, which the
/// status CHECK constraint rules out for rows written after migration.
impl TryFrom<Model> for VideoJob {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: JobStatus = model
            .status
            .parse()
            .map_err(|e: domain::DomainError| AppError::corrupt_row(e.to_string()))?;

        Ok(VideoJob {
            job_id: model.job_id,
            user_id: model.user_id,
            filename: model.filename,
            status,
            video_url: model.video_url,
            result_url: model.result_url,
            frame_count: model.frame_count,
            error_message: model.error_message,
            created_at: model.created_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
        })
    }
}

/// Active model that rewrites every mutable column of an existing row.
///
/// Ownership and creation time are immutable once written.
pub fn lifecycle_update(job: &VideoJob) -> ActiveModel {
    ActiveModel {
        job_id: Unchanged(job.job_id),
        user_id: Unchanged(job.user_id),
        filename: Set(job.filename.clone()),
        status: Set(job.status.as_str().to_string()),
        video_url: Set(job.video_url.clone()),
        result_url: Set(job.result_url.clone()),
        frame_count: Set(job.frame_count),
        error_message: Set(job.error_message.clone()),
        created_at: Unchanged(job.created_at),
        started_at: Set(job.started_at),
        completed_at: Set(job.completed_at),
    }
}
