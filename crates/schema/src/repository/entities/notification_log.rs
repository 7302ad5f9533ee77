//! Notification log database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Unchanged, Set};

use common::AppError;
use domain::{DeliveryStatus, DomainError, NotificationLog, NotificationType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub notification_id: Uuid,
    pub job_id: Uuid,
    pub notification_type: String,
    pub recipient_email: String,
    pub delivery_status: String,
    pub retry_count: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    pub created_at: DateTimeUtc,
    pub sent_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::video_job::Entity",
        from = "Column::JobId",
        to = "super::video_job::Column::JobId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    VideoJob,
}

impl Related<super::video_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn corrupt(e: DomainError) -> AppError {
    AppError::corrupt_row(e.to_string())
}

impl TryFrom<Model> for NotificationLog {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let notification_type: NotificationType =
            model.notification_type.parse().map_err(corrupt)?;
        let delivery_status: DeliveryStatus = model.delivery_status.parse().map_err(corrupt)?;

        Ok(NotificationLog {
            notification_id: model.notification_id,
            job_id: model.job_id,
            notification_type,
            recipient_email: model.recipient_email,
            delivery_status,
            retry_count: model.retry_count,
            error_message: model.error_message,
            created_at: model.created_at,
            sent_at: model.sent_at,
        })
    }
}

/// Active model that rewrites the delivery columns of an existing row.
pub fn delivery_update(notification: &NotificationLog) -> ActiveModel {
    ActiveModel {
        notification_id: Unchanged(notification.notification_id),
        job_id: Unchanged(notification.job_id),
        notification_type: Unchanged(notification.notification_type.as_str().to_string()),
        recipient_email: Set(notification.recipient_email.clone()),
        delivery_status: Set(notification.delivery_status.as_str().to_string()),
        retry_count: Set(notification.retry_count),
        error_message: Set(notification.error_message.clone()),
        created_at: Unchanged(notification.created_at),
        sent_at: Set(notification.sent_at),
    }
}
