//! User id path extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use common::AppError;
use domain::UserId;

/// `:id` path segment parsed as a [`UserId`].
///
/// Anything that is not an integer is rejected with `400 Invalid user ID`.
pub struct UserIdPath(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<UserId>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("Invalid user ID"))?;

        Ok(UserIdPath(id))
    }
}
