//! Postgres-backed user store.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::UserRepository;
use common::{AppError, AppResult, OptionExt};
use domain::{NewUser, User, UserId};

/// `users` table accessed through SeaORM.
///
/// Ids come from the table's serial primary key.
pub struct PgUserStore {
    db: Arc<DatabaseConnection>,
}

impl PgUserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(user.name),
            email: Set(user.email),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(User::from(model))
    }

    async fn get(&self, id: UserId) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found()?;

        Ok(User::from(model))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn update(&self, id: UserId, user: NewUser) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(user.name);
        active.email = Set(user.email);

        // The row can disappear between the lookup and the save
        let model = active.update(self.db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AppError::NotFound,
            other => AppError::from(other),
        })?;

        Ok(User::from(model))
    }

    async fn delete(&self, id: UserId) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(self.db.as_ref()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
