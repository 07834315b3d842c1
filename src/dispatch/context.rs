use std::sync::{Arc, OnceLock};

use axum::{
    body::Bytes,
    extract::Query,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

use super::{encoder::json_response, ResponseEncoder};
use crate::{handlers::error::AppError, utils::RootSpan};

/// The single response a handler committed for its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for CommittedResponse {
    fn into_response(self) -> Response {
        json_response(self.status, self.body)
    }
}

/// Per-request view handed to a route handler: the resolved path
/// parameters, query string, body and a write-once response slot.
pub struct HandlerContext {
    method: Method,
    uri: Uri,
    params: Vec<(String, String)>,
    body: Bytes,
    root_span: Option<RootSpan>,
    committed: Arc<OnceLock<CommittedResponse>>,
}

/// Dispatcher-side handle to the response slot of a [`HandlerContext`].
pub(crate) struct ResponseSlot(Arc<OnceLock<CommittedResponse>>);

impl ResponseSlot {
    pub(crate) fn committed(&self) -> Option<CommittedResponse> {
        self.0.get().cloned()
    }
}

impl HandlerContext {
    pub(crate) fn new(
        method: Method,
        uri: Uri,
        params: Vec<(String, String)>,
        body: Bytes,
        root_span: Option<RootSpan>,
    ) -> (Self, ResponseSlot) {
        let committed = Arc::new(OnceLock::new());
        let slot = ResponseSlot(committed.clone());
        (
            Self {
                method,
                uri,
                params,
                body,
                root_span,
                committed,
            },
            slot,
        )
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn query<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Query::<T>::try_from_uri(&self.uri)
            .map(|Query(query)| query)
            .map_err(|rejection| AppError::ValidationFailure(rejection.body_text()))
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AppError::ValidationFailure(format!("malformed JSON body: {e}")))
    }

    pub(crate) fn root_span(&self) -> Option<&RootSpan> {
        self.root_span.as_ref()
    }

    pub fn is_committed(&self) -> bool {
        self.committed.get().is_some()
    }

    /// Commits the response for this request. Only the first call wins; any
    /// later call is a handler bug and is reported as an error.
    pub fn respond(&self, status: StatusCode, body: impl Into<Bytes>) -> Result<(), AppError> {
        self.committed
            .set(CommittedResponse {
                status,
                body: body.into(),
            })
            .map_err(|rejected| {
                error!(
                    method = %self.method,
                    uri = %self.uri,
                    rejected_status = %rejected.status,
                    "response already committed"
                );
                AppError::ResponseAlreadyCommitted
            })
    }

    pub fn respond_json<T: Serialize + ?Sized>(
        &self,
        status: StatusCode,
        value: &T,
    ) -> Result<(), AppError> {
        self.respond(status, ResponseEncoder::encode(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn context(
        uri: &str,
        params: &[(&str, &str)],
        body: &'static [u8],
    ) -> (HandlerContext, ResponseSlot) {
        HandlerContext::new(
            Method::GET,
            uri.parse().unwrap(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Bytes::from_static(body),
            None,
        )
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Filter {
        title: String,
        published: Option<bool>,
    }

    #[test]
    fn param_lookup() {
        let (ctx, _) = context("/delete-post/abc", &[("id", "abc")], b"");

        assert_eq!(ctx.param("id"), Some("abc"));
        assert_eq!(ctx.param("name"), None);
    }

    #[test]
    fn typed_query() {
        let (ctx, _) = context("/create-post?title=Hi&published=true", &[], b"");

        let filter: Filter = ctx.query().unwrap();
        assert_eq!(
            filter,
            Filter {
                title: "Hi".into(),
                published: Some(true)
            }
        );

        let (ctx, _) = context("/create-post?published=maybe", &[], b"");
        assert!(matches!(
            ctx.query::<Filter>(),
            Err(AppError::ValidationFailure(_))
        ));
    }

    #[test]
    fn typed_body() {
        let (ctx, _) = context("/create-post", &[], br#"{"title":"Hi"}"#);
        assert!(ctx.has_body());
        assert_eq!(ctx.json::<Filter>().unwrap().title, "Hi");

        let (ctx, _) = context("/create-post", &[], b"{not json");
        assert!(matches!(
            ctx.json::<Filter>(),
            Err(AppError::ValidationFailure(_))
        ));
    }

    #[test]
    fn respond_commits_once() {
        let (ctx, slot) = context("/", &[], b"");
        assert!(slot.committed().is_none());

        ctx.respond(StatusCode::OK, "first").unwrap();
        assert!(ctx.is_committed());

        let second = ctx.respond(StatusCode::INTERNAL_SERVER_ERROR, "second");
        assert!(matches!(second, Err(AppError::ResponseAlreadyCommitted)));

        assert_eq!(
            slot.committed(),
            Some(CommittedResponse {
                status: StatusCode::OK,
                body: Bytes::from_static(b"first"),
            })
        );
    }
}
