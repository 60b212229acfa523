//! Domain-level constants.
//!
//! These constants define id allocation and notification content.

use crate::user::UserId;

// =============================================================================
// Identifiers
// =============================================================================

/// First id handed out by a fresh store
pub const FIRST_USER_ID: UserId = 1;

// =============================================================================
// Notifications
// =============================================================================

/// Default push topic for user lifecycle events
pub const USER_UPDATES_TOPIC: &str = "user-updates";

/// Title of the push notification sent when a user is created
pub const USER_CREATED_PUSH_TITLE: &str = "New User Created";

/// Subject of the welcome email
pub const WELCOME_EMAIL_SUBJECT: &str = "Welcome to Our Service";

/// Push notification body for a newly created user
pub fn user_created_push_body(name: &str) -> String {
    format!("User {} has been successfully created.", name)
}

/// Welcome email body for a newly created user
pub fn welcome_email_body(name: &str) -> String {
    format!("Hello {}, welcome to our platform!", name)
}
