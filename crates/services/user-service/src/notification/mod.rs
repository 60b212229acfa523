//! Side-effect notifications sent when a user is created.
//!
//! Each channel implements [`Notifier`]. [`NotifierSet`] fans a single event
//! out to every configured channel.

mod email;
mod push;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use email::{EmailConfig, EmailMessage, EmailNotifier};
pub use push::{PushConfig, PushMessage, PushNotifier};

/// Timeout applied to every outbound notification request
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

/// A channel that reacts to user lifecycle events.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a freshly created user
    async fn user_created(&self, user: &User) -> AppResult<()>;
}

/// Named collection of notifiers invoked together.
#[derive(Default, Clone)]
pub struct NotifierSet {
    channels: Vec<(&'static str, Arc<dyn Notifier>)>,
}

impl NotifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel under the given name
    pub fn with(mut self, name: &'static str, notifier: Arc<dyn Notifier>) -> Self {
        self.channels.push((name, notifier));
        self
    }

    /// Build the email and push channels from configuration.
    pub fn from_config(email: EmailConfig, push: PushConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(NOTIFICATION_TIMEOUT)
            .build()?;

        Ok(Self::new()
            .with("push", Arc::new(PushNotifier::new(push, client.clone())))
            .with("email", Arc::new(EmailNotifier::new(email, client))))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[async_trait]
impl Notifier for NotifierSet {
    /// Runs every channel concurrently. All channels are attempted even when
    /// some fail; failures are reported together.
    async fn user_created(&self, user: &User) -> AppResult<()> {
        if self.is_empty() {
            tracing::debug!(user_id = user.id, "No notification channels configured");
            return Ok(());
        }

        let results = join_all(
            self.channels
                .iter()
                .map(|(name, notifier)| async move { (*name, notifier.user_created(user).await) }),
        )
        .await;

        let failures: Vec<String> = results
            .into_iter()
            .filter_map(|(name, result)| result.err().map(|e| format!("{}: {}", name, e)))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::notification(failures.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_set_succeeds() {
        let set = NotifierSet::new();
        assert!(set.is_empty());
        assert!(set.user_created(&alice()).await.is_ok());
    }

    #[tokio::test]
    async fn every_channel_runs_even_when_one_fails() {
        let mut failing = MockNotifier::new();
        failing
            .expect_user_created()
            .times(1)
            .returning(|_| Err(AppError::notification("smtp down")));

        let mut healthy = MockNotifier::new();
        healthy
            .expect_user_created()
            .withf(|user| user.id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let set = NotifierSet::new()
            .with("email", Arc::new(failing))
            .with("push", Arc::new(healthy));

        let err = set.user_created(&alice()).await.unwrap_err();
        match err {
            AppError::Notification(msg) => {
                assert!(msg.starts_with("email:"));
                assert!(msg.contains("smtp down"));
                assert!(!msg.contains("push"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unconfigured_channels_log_instead_of_sending() {
        let set = NotifierSet::from_config(EmailConfig::default(), PushConfig::default()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.user_created(&alice()).await.is_ok());
    }
}
