use crate::{
    dispatch::{json_response, ResponseEncoder},
    storage::StorageError,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strum_macros::AsRefStr;
use thiserror::Error;

#[derive(Debug, Error, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AppError {
    #[error("Post not found")]
    NotFound,

    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("Invalid input: {0}")]
    ValidationFailure(String),

    #[error("Store failure: {0}")]
    StoreFailure(#[source] StorageError),

    #[error("Response already committed for this request")]
    ResponseAlreadyCommitted,

    #[error("Handler finished without responding")]
    NoResponse,

    #[error("Failed to encode response body")]
    Encoding(#[from] serde_json::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ValidationFailure(_) => StatusCode::BAD_REQUEST,
            AppError::StoreFailure(_)
            | AppError::ResponseAlreadyCommitted
            | AppError::NoResponse
            | AppError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        match value {
            // an id that does not parse cannot name a live post
            StorageError::NotFound | StorageError::ParseIdFromString(..) => Self::NotFound,
            _ => Self::StoreFailure(value),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = ?self, "AppError");
        } else {
            tracing::warn!(error = ?self, "AppError");
        }

        let (status, body) = ResponseEncoder::encode_error(&self);
        json_response(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SledStorageError;

    #[test]
    fn storage_errors_keep_their_kind() {
        assert!(matches!(AppError::from(StorageError::NotFound), AppError::NotFound));

        let parse = "xyz".parse::<crate::storage::PostId>().unwrap_err();
        assert!(matches!(AppError::from(parse), AppError::NotFound));

        let internal = StorageError::Internal(SledStorageError::NotFound);
        assert!(matches!(AppError::from(internal), AppError::StoreFailure(_)));
    }

    #[test]
    fn kinds_map_to_fixed_status_codes() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ValidationFailure("title".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::StoreFailure(StorageError::NotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
