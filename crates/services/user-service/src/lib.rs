//! User Service Library
//!
//! HTTP CRUD service for users. The records live either in an in-memory
//! store or in Postgres, selected at startup. New users are announced by
//! email and push notification.

pub mod api;
pub mod config;
pub mod infra;
pub mod notification;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::{StoreBackend, UserServiceConfig};
use crate::infra::Database;
use crate::notification::NotifierSet;
use crate::repository::{MemoryUserStore, PgUserStore, UserRepository};
use crate::service::UserManager;

/// Build the store, notifiers and service described by the configuration.
///
/// For the Postgres backend this connects and applies pending migrations.
pub async fn build_state(config: &UserServiceConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let (repo, database): (Arc<dyn UserRepository>, Option<Database>) = match config.store {
        StoreBackend::Memory => (Arc::new(MemoryUserStore::new()), None),
        StoreBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            (Arc::new(PgUserStore::new(db.get_connection())), Some(db))
        }
    };
    info!("Using {} user store", config.store);

    let notifiers = NotifierSet::from_config(config.email.clone(), config.push.clone())?;
    info!(
        channels = notifiers.len(),
        email = config.email.is_configured(),
        push = config.push.is_configured(),
        "Notification channels ready"
    );
    let user_service = Arc::new(UserManager::new(repo, Arc::new(notifiers)));

    Ok(AppState::new(user_service, config.store, database))
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config).await?;
    let app = create_router(state);

    let addr: SocketAddr = config.service.bind_addr().parse()?;
    info!("User service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
