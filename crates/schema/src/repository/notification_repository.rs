//! Notification log repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::notification_log::{
    self, delivery_update, ActiveModel, Entity as NotificationEntity,
};
use common::{AppError, AppResult};
use domain::validation::validate;
use domain::{DeliveryStatus, NewNotification, NotificationLog, DEFAULT_RETRY_COUNT};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Notification log repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Log a pending notification for an existing job
    async fn create(&self, new_notification: NewNotification) -> AppResult<NotificationLog>;

    /// Find notification by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<NotificationLog>>;

    /// Every notification sent about a job, oldest first
    async fn list_by_job(&self, job_id: Uuid) -> AppResult<Vec<NotificationLog>>;

    /// Oldest notifications in a delivery status, at most `limit`
    async fn list_by_status(
        &self,
        status: DeliveryStatus,
        limit: u64,
    ) -> AppResult<Vec<NotificationLog>>;

    /// Persist delivery fields of an existing notification
    async fn save(&self, notification: NotificationLog) -> AppResult<NotificationLog>;
}

/// Concrete implementation of NotificationRepository
pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn create(&self, new_notification: NewNotification) -> AppResult<NotificationLog> {
        create(&self.db, new_notification).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<NotificationLog>> {
        find_by_id(&self.db, id).await
    }

    async fn list_by_job(&self, job_id: Uuid) -> AppResult<Vec<NotificationLog>> {
        list_by_job(&self.db, job_id).await
    }

    async fn list_by_status(
        &self,
        status: DeliveryStatus,
        limit: u64,
    ) -> AppResult<Vec<NotificationLog>> {
        list_by_status(&self.db, status, limit).await
    }

    async fn save(&self, notification: NotificationLog) -> AppResult<NotificationLog> {
        save(&self.db, notification).await
    }
}

fn into_domain(models: Vec<notification_log::Model>) -> AppResult<Vec<NotificationLog>> {
    models.into_iter().map(NotificationLog::try_from).collect()
}

pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    new_notification: NewNotification,
) -> AppResult<NotificationLog> {
    validate(&new_notification)?;

    let active_model = ActiveModel {
        notification_id: Set(Uuid::new_v4()),
        job_id: Set(new_notification.job_id),
        notification_type: Set(new_notification.notification_type.as_str().to_string()),
        recipient_email: Set(new_notification.recipient_email),
        delivery_status: Set(DeliveryStatus::Pending.as_str().to_string()),
        retry_count: Set(DEFAULT_RETRY_COUNT),
        error_message: Set(None),
        created_at: Set(chrono::Utc::now()),
        sent_at: Set(None),
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    NotificationLog::try_from(model)
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<NotificationLog>> {
    NotificationEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?
        .map(NotificationLog::try_from)
        .transpose()
}

pub(crate) async fn list_by_job<C: ConnectionTrait>(
    db: &C,
    job_id: Uuid,
) -> AppResult<Vec<NotificationLog>> {
    let models = NotificationEntity::find()
        .filter(notification_log::Column::JobId.eq(job_id))
        .order_by_asc(notification_log::Column::CreatedAt)
        .all(db)
        .await
        .map_err(AppError::from)?;

    into_domain(models)
}

pub(crate) async fn list_by_status<C: ConnectionTrait>(
    db: &C,
    status: DeliveryStatus,
    limit: u64,
) -> AppResult<Vec<NotificationLog>> {
    let models = NotificationEntity::find()
        .filter(notification_log::Column::DeliveryStatus.eq(status.as_str()))
        .order_by_asc(notification_log::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(AppError::from)?;

    into_domain(models)
}

pub(crate) async fn save<C: ConnectionTrait>(
    db: &C,
    notification: NotificationLog,
) -> AppResult<NotificationLog> {
    notification.check_delivery_state()?;

    match delivery_update(&notification).update(db).await {
        Ok(model) => NotificationLog::try_from(model),
        Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
        Err(e) => Err(AppError::from(e)),
    }
}
