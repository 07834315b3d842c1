pub(crate) mod error;
pub(crate) mod post;
pub mod types;

pub(crate) use crate::service::Service;
use axum::http::StatusCode;
pub(crate) use types::*;

use crate::dispatch::HandlerContext;
use error::AppError;

pub(crate) const HEALTH_MESSAGE: &str = "Server is up and running";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse),
    ),
    tag = "root"
)]
#[tracing::instrument(name = "health", skip_all)]
pub(crate) async fn health(ctx: HandlerContext, _service: Service) -> Result<(), AppError> {
    ctx.respond_json(
        StatusCode::OK,
        &HealthResponse {
            data: HEALTH_MESSAGE.to_owned(),
        },
    )
}
