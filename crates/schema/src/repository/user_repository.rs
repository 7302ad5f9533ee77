//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::validation::validate;
use domain::{NewUser, User, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a validated user
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Apply profile changes and bump `updated_at`
    async fn update(&self, id: Uuid, changes: UserUpdate) -> AppResult<User>;

    /// Delete the user row; jobs and their notifications cascade
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Number of users
    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        create(&self.db, new_user).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        find_by_username(&self.db, username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email(&self.db, email).await
    }

    async fn update(&self, id: Uuid, changes: UserUpdate) -> AppResult<User> {
        update(&self.db, id, changes).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete(&self.db, id).await
    }

    async fn count(&self) -> AppResult<u64> {
        count(&self.db).await
    }
}

// Queries shared with the transaction-bound repository.

pub(crate) async fn create<C: ConnectionTrait>(db: &C, new_user: NewUser) -> AppResult<User> {
    validate(&new_user)?;

    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        user_id: Set(Uuid::new_v4()),
        username: Set(new_user.username),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    tracing::debug!(user_id = %model.user_id, "User created");
    Ok(User::from(model))
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    let result = UserEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(User::from))
}

pub(crate) async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> AppResult<Option<User>> {
    let result = UserEntity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(User::from))
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<User>> {
    let result = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(User::from))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: UserUpdate,
) -> AppResult<User> {
    changes.check()?;

    let user = UserEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    if changes.is_empty() {
        return Ok(User::from(user));
    }

    let mut active: ActiveModel = user.into();

    if let Some(username) = changes.username {
        active.username = Set(username);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    if let Some(password_hash) = changes.password_hash {
        active.password_hash = Set(password_hash);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(User::from(model))
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = UserEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = %id, "User deleted with dependent jobs");
    Ok(())
}

pub(crate) async fn count<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    UserEntity::find().count(db).await.map_err(AppError::from)
}

