//! User domain entity and related types.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a user by the store.
pub type UserId = i32;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

impl User {
    /// Build a stored user from its id and field values.
    pub fn from_parts(id: UserId, fields: NewUser) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
        }
    }

    /// Overwrite every mutable field. The id is left untouched.
    pub fn replace_fields(&mut self, fields: NewUser) {
        self.name = fields.name;
        self.email = fields.email;
    }
}

/// Field values for creating or replacing a user.
///
/// Carries no id: stores assign ids on create and keep them on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl From<User> for NewUser {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
        }
    }
}
