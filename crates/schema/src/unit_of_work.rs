//! Unit of Work: atomic writes across users, jobs and notifications.
//!
//! Every repository handed out by a [`TransactionContext`] runs on the same
//! database transaction. The transaction commits when the closure returns
//! `Ok` and rolls back when it returns `Err`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use contracts::ListJobsQuery;
use domain::{
    DeliveryStatus, JobStatus, NewNotification, NewUser, NewVideoJob, NotificationLog, User,
    UserUpdate, VideoJob,
};

use crate::repository::{
    notification_repository, user_repository, video_job_repository, NotificationRepository,
    NotificationStore, UserRepository, UserStore, VideoJobRepository, VideoJobStore,
};

/// Closure run inside a transaction
pub type TransactionFn<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic methods; mock the
/// repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get video job repository
    fn jobs(&self) -> Arc<dyn VideoJobRepository>;

    /// Get notification repository
    fn notifications(&self) -> Arc<dyn NotificationRepository>;

    /// Execute a closure within a READ COMMITTED transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFn<'a, T> + Send,
        T: Send;

    /// Execute a closure within a SERIALIZABLE transaction.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFn<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'a> {
        TxUserRepository { txn: self.txn }
    }

    pub fn jobs(&self) -> TxVideoJobRepository<'a> {
        TxVideoJobRepository { txn: self.txn }
    }

    pub fn notifications(&self) -> TxNotificationRepository<'a> {
        TxNotificationRepository { txn: self.txn }
    }

    /// Underlying transaction, for statements the repositories do not cover.
    pub fn transaction(&self) -> &'a DatabaseTransaction {
        self.txn
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    job_repo: Arc<VideoJobStore>,
    notification_repo: Arc<NotificationStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            job_repo: Arc::new(VideoJobStore::new(db.clone())),
            notification_repo: Arc::new(NotificationStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFn<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let result = f(TransactionContext::new(&txn)).await;

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn jobs(&self) -> Arc<dyn VideoJobRepository> {
        self.job_repo.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFn<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFn<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

/// Transaction-bound user repository
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        user_repository::create(self.txn, new_user).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        user_repository::find_by_username(self.txn, username).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_repository::find_by_email(self.txn, email).await
    }

    pub async fn update(&self, id: Uuid, changes: UserUpdate) -> AppResult<User> {
        user_repository::update(self.txn, id, changes).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        user_repository::delete(self.txn, id).await
    }

    pub async fn count(&self) -> AppResult<u64> {
        user_repository::count(self.txn).await
    }
}

/// Transaction-bound video job repository
pub struct TxVideoJobRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxVideoJobRepository<'a> {
    pub async fn create(&self, new_job: NewVideoJob) -> AppResult<VideoJob> {
        video_job_repository::create(self.txn, new_job).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VideoJob>> {
        video_job_repository::find_by_id(self.txn, id).await
    }

    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        query: ListJobsQuery,
    ) -> AppResult<(Vec<VideoJob>, u64)> {
        video_job_repository::list_by_user(self.txn, user_id, query).await
    }

    pub async fn count_by_user(&self, user_id: Uuid, status: Option<JobStatus>) -> AppResult<u64> {
        video_job_repository::count_by_user(self.txn, user_id, status).await
    }

    pub async fn save(&self, job: VideoJob) -> AppResult<VideoJob> {
        video_job_repository::save(self.txn, job).await
    }
}

/// Transaction-bound notification repository
pub struct TxNotificationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxNotificationRepository<'a> {
    pub async fn create(&self, new_notification: NewNotification) -> AppResult<NotificationLog> {
        notification_repository::create(self.txn, new_notification).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<NotificationLog>> {
        notification_repository::find_by_id(self.txn, id).await
    }

    pub async fn list_by_job(&self, job_id: Uuid) -> AppResult<Vec<NotificationLog>> {
        notification_repository::list_by_job(self.txn, job_id).await
    }

    pub async fn list_by_status(
        &self,
        status: DeliveryStatus,
        limit: u64,
    ) -> AppResult<Vec<NotificationLog>> {
        notification_repository::list_by_status(self.txn, status, limit).await
    }

    pub async fn save(&self, notification: NotificationLog) -> AppResult<NotificationLog> {
        notification_repository::save(self.txn, notification).await
    }
}

/// Simpler API for executing transactional operations.
///
/// ```ignore
/// let user = with_transaction!(uow, |ctx| {
///     let user = ctx.users().create(new_user).await?;
///     ctx.jobs().create(NewVideoJob::new(user.user_id, "clip.mp4", url)?).await?;
///     Ok(user)
/// })?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
