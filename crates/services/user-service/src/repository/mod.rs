//! Repository layer for data access.
//!
//! Two stores implement the same [`UserRepository`] contract: an in-memory
//! map and a Postgres table.

pub mod entities;
mod memory_store;
mod postgres_store;

use async_trait::async_trait;

use common::AppResult;
use domain::{NewUser, User, UserId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use memory_store::MemoryUserStore;
pub use postgres_store::PgUserStore;

/// User repository trait for dependency injection.
///
/// Missing ids are reported as [`common::AppError::NotFound`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned id
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Fetch a user by id
    async fn get(&self, id: UserId) -> AppResult<User>;

    /// All current users; empty when the store holds none
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Replace name and email of an existing user, keeping its id
    async fn update(&self, id: UserId, user: NewUser) -> AppResult<User>;

    /// Remove a user by id
    async fn delete(&self, id: UserId) -> AppResult<()>;
}
