use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    http::{Method, Uri},
    response::{IntoResponse, Response},
};
use futures_util::{future::BoxFuture, FutureExt};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::context::HandlerContext;
use crate::{handlers::error::AppError, utils::RootSpan};

pub type HandlerFuture = BoxFuture<'static, Result<(), AppError>>;

type BoxedHandler<S> = Arc<dyn Fn(HandlerContext, S) -> HandlerFuture + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Route pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("Route pattern has an unnamed parameter: {0}")]
    EmptyParamName(String),

    #[error("Route pattern has more than one parameter: {0}")]
    TooManyParams(String),

    #[error("Route already registered: {method} {pattern}")]
    Duplicate { method: Method, pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A `/`-separated path pattern with at most one `:name` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| RouteError::MissingLeadingSlash(pattern.to_owned()))?;

        let segments = rest
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some("") => Err(RouteError::EmptyParamName(pattern.to_owned())),
                Some(name) => Ok(Segment::Param(name.to_owned())),
                None => Ok(Segment::Literal(segment.to_owned())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Param(_)))
            .count()
            > 1
        {
            return Err(RouteError::TooManyParams(pattern.to_owned()));
        }

        Ok(Self {
            raw: pattern.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the captured parameters when `path` matches segment by segment.
    fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.push((name.clone(), part.to_owned()))
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

/// Pattern of the route that produced a response, attached as a response
/// extension so outer middleware can label requests by route.
#[derive(Debug, Clone)]
pub struct MatchedRoute(pub String);

/// Everything the dispatcher needs from an inbound request.
pub struct DispatchRequest {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) body: Bytes,
    pub(crate) root_span: Option<RootSpan>,
}

impl DispatchRequest {
    pub fn new(method: Method, uri: Uri, body: Bytes) -> Self {
        Self {
            method,
            uri,
            body,
            root_span: None,
        }
    }

    pub(crate) fn with_root_span(mut self, root_span: Option<RootSpan>) -> Self {
        self.root_span = root_span;
        self
    }
}

struct Route<S> {
    method: Method,
    pattern: PathPattern,
    handler: BoxedHandler<S>,
}

/// Maps `(method, path pattern)` to handlers and runs the one matching a
/// request. Handlers receive a [`HandlerContext`] and a clone of the state.
pub struct RouteTable<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S> RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H, Fut>(
        mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<Self, RouteError>
    where
        H: Fn(HandlerContext, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let pattern = PathPattern::parse(pattern)?;

        if self
            .routes
            .iter()
            .any(|route| route.method == method && route.pattern == pattern)
        {
            return Err(RouteError::Duplicate {
                method,
                pattern: pattern.raw,
            });
        }

        info!(%method, pattern = %pattern.as_str(), "register route");

        self.routes.push(Route {
            method,
            pattern,
            handler: Arc::new(move |ctx: HandlerContext, state: S| -> HandlerFuture {
                handler(ctx, state).boxed()
            }),
        });
        Ok(self)
    }

    /// Registered `(method, pattern)` pairs in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.routes
            .iter()
            .map(|route| (&route.method, route.pattern.as_str()))
    }

    fn resolve(&self, method: &Method, path: &str) -> Option<(&Route<S>, Vec<(String, String)>)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.pattern.captures(path).map(|params| (route, params)))
    }

    #[instrument(
        name = "RouteTable::dispatch",
        skip_all,
        fields(method = %request.method, path = %request.uri.path())
    )]
    pub async fn dispatch(&self, request: DispatchRequest, state: S) -> Response {
        let Some((route, params)) = self.resolve(&request.method, request.uri.path()) else {
            warn!("no route matched");
            return AppError::RouteNotFound {
                method: request.method.to_string(),
                path: request.uri.path().to_owned(),
            }
            .into_response();
        };

        if let Some(root_span) = &request.root_span {
            root_span.record().route(route.pattern.as_str());
        }

        let (ctx, slot) = HandlerContext::new(
            request.method,
            request.uri,
            params,
            request.body,
            request.root_span,
        );

        let outcome = (route.handler)(ctx, state).await;

        let mut response = match (slot.committed(), outcome) {
            (Some(committed), Ok(())) => committed.into_response(),
            (Some(committed), Err(e)) => {
                error!(error = %e, "handler failed after committing a response");
                committed.into_response()
            }
            (None, Err(e)) => e.into_response(),
            (None, Ok(())) => AppError::NoResponse.into_response(),
        };

        response
            .extensions_mut()
            .insert(MatchedRoute(route.pattern.as_str().to_owned()));
        response
    }
}
