//! Custom request extractors.

mod user_id;
mod validated_json;

pub use user_id::UserIdPath;
pub use validated_json::ValidatedJson;
