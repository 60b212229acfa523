//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::user_handler::UserRequest;
use domain::User;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::user_handler::create_user,
        crate::api::handlers::user_handler::list_users,
        crate::api::handlers::user_handler::get_user,
        crate::api::handlers::user_handler::update_user,
        crate::api::handlers::user_handler::delete_user,
    ),
    components(schemas(User, UserRequest)),
    tags(
        (name = "Users", description = "User CRUD endpoints"),
    )
)]
pub struct ApiDoc;
