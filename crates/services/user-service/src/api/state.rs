//! Application state for dependency injection.

use std::sync::Arc;

use crate::config::StoreBackend;
use crate::infra::Database;
use crate::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Which store backs `user_service`
    pub store: StoreBackend,
    /// Present only when the Postgres store is in use
    pub database: Option<Database>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        store: StoreBackend,
        database: Option<Database>,
    ) -> Self {
        Self {
            user_service,
            store,
            database,
        }
    }
}
