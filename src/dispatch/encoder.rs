use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::handlers::error::AppError;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Snake-case error kind, e.g. `not_found`.
    pub error: String,
    pub message: String,
}

/// Turns handler results into JSON bytes.
///
/// Output is canonical: struct fields serialize in declaration order and no
/// maps with unstable iteration order are involved, so the same value always
/// yields the same bytes.
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, AppError> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    pub fn encode_error(error: &AppError) -> (StatusCode, Bytes) {
        let body = ErrorBody {
            error: error.as_ref().to_owned(),
            message: error.to_string(),
        };
        let bytes = serde_json::to_vec(&body).map(Bytes::from).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to encode error body");
            Bytes::from_static(
                br#"{"error":"encoding","message":"Failed to encode response body"}"#,
            )
        });

        (error.status_code(), bytes)
    }
}

pub(crate) fn json_response(status: StatusCode, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
