//! Welcome email delivery.
//!
//! Emails go through the SendGrid v3 API. In development mode (no API key)
//! emails are logged instead of sent.

use std::env;

use async_trait::async_trait;
use serde::Serialize;

use common::{AppError, AppResult};
use domain::{welcome_email_body, User, WELCOME_EMAIL_SUBJECT};

use super::Notifier;

const DEFAULT_SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Email settings from environment.
#[derive(Clone)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub from_email: String,
    pub from_name: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish()
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("SENDGRID_API_KEY").ok().filter(|k| !k.is_empty()),
            api_url: env::var("SENDGRID_API_URL").unwrap_or(defaults.api_url),
            from_email: env::var("EMAIL_FROM").unwrap_or(defaults.from_email),
            from_name: env::var("EMAIL_FROM_NAME").unwrap_or(defaults.from_name),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_SENDGRID_URL.to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: "User Service".to_string(),
        }
    }
}

/// A single plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Email body content
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Welcome email for a newly created user
    pub fn welcome(user: &User) -> Self {
        Self::new(
            user.email.clone(),
            WELCOME_EMAIL_SUBJECT,
            welcome_email_body(&user.name),
        )
    }
}

#[derive(Debug, Serialize)]
struct SendGridRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

impl<'a> SendGridRequest<'a> {
    fn new(config: &'a EmailConfig, message: &'a EmailMessage) -> Self {
        Self {
            personalizations: [Personalization {
                to: [Address {
                    email: &message.to,
                    name: None,
                }],
            }],
            from: Address {
                email: &config.from_email,
                name: Some(&config.from_name),
            },
            subject: &message.subject,
            // Names are not escaped, so never send an HTML part
            content: [Content {
                kind: "text/plain",
                value: &message.body,
            }],
        }
    }
}

/// Sends welcome emails to new users.
pub struct EmailNotifier {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Deliver one email, or log it when SendGrid is not configured
    pub async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::warn!("SENDGRID_API_KEY not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {} <{}>\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                self.config.from_name,
                self.config.from_email,
                message.to,
                message.subject,
                message.body
            );
            return Ok(());
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&SendGridRequest::new(&self.config, message))
            .send()
            .await
            .map_err(|e| AppError::notification(format!("email request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notification(format!(
                "email provider responded with {}",
                status
            )));
        }

        tracing::info!(to = %message.to, status = %status, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn user_created(&self, user: &User) -> AppResult<()> {
        self.send(&EmailMessage::welcome(user)).await
    }
}
