//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain types with no infrastructure dependencies.
//! Both user stores and the HTTP layer share them.

pub mod constants;
pub mod user;

pub use constants::*;
pub use user::{NewUser, User, UserId};
