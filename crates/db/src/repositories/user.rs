//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use thiserror::Error;
use tracing::info;

use crate::entities::users::{self, ROLE_ADMIN, ROLE_USER};

/// Error types for user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// No such user.
    #[error("Пользователь {0} не найден")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// All registered users, sorted by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
    }

    /// Returns the existing user or registers a new one on first contact.
    ///
    /// Ids listed in `admin_ids` get the admin role at registration. A
    /// changed Telegram username is refreshed on every contact.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn get_or_create(
        &self,
        id: i64,
        username: Option<&str>,
        admin_ids: &[i64],
    ) -> Result<users::Model, DbErr> {
        if let Some(user) = self.find_by_id(id).await? {
            if user.username.as_deref() != username {
                let mut active: users::ActiveModel = user.into();
                active.username = Set(username.map(ToOwned::to_owned));
                return active.update(&self.db).await;
            }
            return Ok(user);
        }

        let role = if admin_ids.contains(&id) {
            ROLE_ADMIN
        } else {
            ROLE_USER
        };
        let user = users::ActiveModel {
            id: Set(id),
            username: Set(username.map(ToOwned::to_owned)),
            role: Set(role.to_owned()),
            cash_balance: Set(0),
            created_at: Set(Utc::now()),
        };
        let user = user.insert(&self.db).await?;

        info!(user_id = user.id, role = %user.role, "New user registered");
        Ok(user)
    }

    /// Sets a user's role.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub async fn set_role(&self, id: i64, role: &str) -> Result<users::Model, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut active: users::ActiveModel = user.into();
        active.role = Set(role.to_owned());
        let user = active.update(&self.db).await?;

        info!(user_id = user.id, role = %user.role, "User role updated");
        Ok(user)
    }
}
