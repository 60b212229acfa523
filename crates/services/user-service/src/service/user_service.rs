//! User service - Handles user-related use cases.
//!
//! Creation stores the user and then announces it through the notifier.

use async_trait::async_trait;
use std::sync::Arc;

use common::AppResult;
use domain::{NewUser, User, UserId};

use crate::notification::Notifier;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user and send creation notifications
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: UserId) -> AppResult<User>;

    /// List all users (empty when there are none)
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Replace a user's name and email
    async fn update_user(&self, id: UserId, user: NewUser) -> AppResult<User>;

    /// Delete user by ID
    async fn delete_user(&self, id: UserId) -> AppResult<()>;
}

/// Concrete implementation of UserService using a repository and a notifier.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let created = self.repo.create(user).await?;

        // The user already exists at this point; a failed notification is
        // reported in the logs only.
        if let Err(e) = self.notifier.user_created(&created).await {
            tracing::warn!(user_id = created.id, error = %e, "Failed to send creation notifications");
        }

        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> AppResult<User> {
        self.repo.get(id).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_user(&self, id: UserId, user: NewUser) -> AppResult<User> {
        self.repo.update(id, user).await
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        self.repo.delete(id).await
    }
}
