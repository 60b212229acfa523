//! Topic push notifications through Firebase Cloud Messaging (HTTP v1).

use std::env;

use async_trait::async_trait;
use serde::Serialize;

use common::{AppError, AppResult};
use domain::{user_created_push_body, User, USER_CREATED_PUSH_TITLE, USER_UPDATES_TOPIC};

use super::Notifier;

const DEFAULT_FCM_URL: &str = "https://fcm.googleapis.com";

/// Push settings from environment.
///
/// Both `project_id` and `access_token` are needed for real delivery.
#[derive(Clone)]
pub struct PushConfig {
    pub project_id: Option<String>,
    pub access_token: Option<String>,
    pub api_url: String,
    pub topic: String,
}

impl std::fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushConfig")
            .field("project_id", &self.project_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("topic", &self.topic)
            .finish()
    }
}

impl PushConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            project_id: env::var("FCM_PROJECT_ID").ok().filter(|v| !v.is_empty()),
            access_token: env::var("FCM_ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),
            api_url: env::var("FCM_API_URL").unwrap_or(defaults.api_url),
            topic: env::var("FCM_TOPIC").unwrap_or(defaults.topic),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.project_id.is_some() && self.access_token.is_some()
    }

    fn send_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.api_url.trim_end_matches('/'),
            project_id
        )
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            access_token: None,
            api_url: DEFAULT_FCM_URL.to_string(),
            topic: USER_UPDATES_TOPIC.to_string(),
        }
    }
}

/// Notification published to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub topic: String,
    pub title: String,
    pub body: String,
}

impl PushMessage {
    /// Announcement of a newly created user
    pub fn user_created(user: &User, topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            title: USER_CREATED_PUSH_TITLE.to_string(),
            body: user_created_push_body(&user.name),
        }
    }
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    topic: &'a str,
    notification: FcmNotification<'a>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

impl<'a> From<&'a PushMessage> for FcmRequest<'a> {
    fn from(message: &'a PushMessage) -> Self {
        Self {
            message: FcmMessage {
                topic: &message.topic,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
            },
        }
    }
}

/// Publishes user events to an FCM topic.
pub struct PushNotifier {
    config: PushConfig,
    client: reqwest::Client,
}

impl PushNotifier {
    pub fn new(config: PushConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Publish one message, or log it when FCM is not configured
    pub async fn send(&self, message: &PushMessage) -> AppResult<()> {
        let (Some(project_id), Some(token)) = (
            self.config.project_id.as_deref(),
            self.config.access_token.as_deref(),
        ) else {
            tracing::warn!("FCM not configured - logging push notification instead of sending");
            tracing::info!(
                topic = %message.topic,
                title = %message.title,
                body = %message.body,
                "Push notification (not sent)"
            );
            return Ok(());
        };

        let response = self
            .client
            .post(self.config.send_url(project_id))
            .bearer_auth(token)
            .json(&FcmRequest::from(message))
            .send()
            .await
            .map_err(|e| AppError::notification(format!("push request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notification(format!(
                "push provider responded with {}",
                status
            )));
        }

        tracing::info!(topic = %message.topic, "Push notification sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for PushNotifier {
    async fn user_created(&self, user: &User) -> AppResult<()> {
        self.send(&PushMessage::user_created(user, self.config.topic.as_str()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_created_message_uses_name_and_topic() {
        let user = User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        };
        let message = PushMessage::user_created(&user, "user-updates");

        assert_eq!(message.topic, "user-updates");
        assert_eq!(message.title, "New User Created");
        assert_eq!(message.body, "User Alice has been successfully created.");
    }

    #[test]
    fn fcm_payload_shape() {
        let message = PushMessage {
            topic: "t".to_string(),
            title: "hello".to_string(),
            body: "world".to_string(),
        };
        let json = serde_json::to_value(FcmRequest::from(&message)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "message": {
                    "topic": "t",
                    "notification": { "title": "hello", "body": "world" }
                }
            })
        );
    }

    #[test]
    fn send_url_includes_project() {
        let config = PushConfig {
            api_url: "https://fcm.example.com/".to_string(),
            ..PushConfig::default()
        };
        assert_eq!(
            config.send_url("demo"),
            "https://fcm.example.com/v1/projects/demo/messages:send"
        );
    }

    #[test]
    fn needs_project_and_token() {
        let config = PushConfig {
            project_id: Some("demo".to_string()),
            ..PushConfig::default()
        };
        assert!(!config.is_configured());
    }
}
