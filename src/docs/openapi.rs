use utoipa::OpenApi;

use crate::dispatch::ErrorBody;
use crate::handlers::{CreatePost, HealthResponse};
use crate::storage::Post;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health,
        crate::handlers::post::create_from_query,
        crate::handlers::post::create_from_body,
        crate::handlers::post::list,
        crate::handlers::post::get,
        crate::handlers::post::delete,
    ),
    components(
        schemas(Post, CreatePost, HealthResponse, ErrorBody),
    ),
    tags(
        (name = "root", description = "Service status"),
        (name = "posts", description = "Endpoints to create, list and delete posts")
    ),
    info(
        title = "Post API",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
