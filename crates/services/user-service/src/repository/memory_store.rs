//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use common::{AppError, AppResult, OptionExt};
use domain::{NewUser, User, UserId, FIRST_USER_ID};

use super::UserRepository;

/// Map of users guarded by a single lock.
///
/// Every operation holds the lock for its whole duration, so operations are
/// serialized and two concurrent creates never share an id. Ids come from a
/// counter that only moves forward; deleting a user never frees its id.
pub struct MemoryUserStore {
    state: Mutex<StoreState>,
}

struct StoreState {
    users: HashMap<UserId, User>,
    next_id: UserId,
}

impl MemoryUserStore {
    /// Create an empty store whose first id is [`FIRST_USER_ID`]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                users: HashMap::new(),
                next_id: FIRST_USER_ID,
            }),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.state.lock();

        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| AppError::internal("user id space exhausted"))?;

        let user = User::from_parts(id, user);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: UserId) -> AppResult<User> {
        let state = self.state.lock();
        state.users.get(&id).cloned().ok_or_not_found()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let state = self.state.lock();
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn update(&self, id: UserId, user: NewUser) -> AppResult<User> {
        let mut state = self.state.lock();
        let stored = state.users.get_mut(&id).ok_or_not_found()?;
        stored.replace_fields(user);
        Ok(stored.clone())
    }

    async fn delete(&self, id: UserId) -> AppResult<()> {
        let mut state = self.state.lock();
        state.users.remove(&id).map(|_| ()).ok_or_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exhausted_id_space_is_an_internal_error() {
        let store = MemoryUserStore::new();
        store.state.lock().next_id = UserId::MAX;

        let result = store.create(NewUser::new("Last", "last@example.com")).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(store.list().await.unwrap().is_empty());
    }
}
