use std::sync::Arc;

use crate::config::Settings;
use crate::dispatch::{DispatchRequest, RouteError, RouteTable};
use crate::docs::openapi::ApiDoc;
use crate::handlers::error::AppError;
use crate::init::StartupError;
use crate::service::Service;
use crate::utils::RootSpan;
use crate::{
    handlers,
    middleware::{metrics::record_metrics, trace_root::trace_root},
};
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::from_fn,
    response::{IntoResponse, Response},
    Router,
};

use tower_http::trace::TraceLayer;
use tracing::{info, instrument};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
pub(crate) struct AppState {
    service: Service,
    routes: Arc<RouteTable<Service>>,
    max_body_bytes: usize,
}

pub(crate) fn post_routes() -> Result<RouteTable<Service>, RouteError> {
    RouteTable::new()
        .register(Method::GET, "/", handlers::health)?
        .register(Method::GET, "/create-post", handlers::post::create_from_query)?
        .register(Method::POST, "/create-post", handlers::post::create_from_body)?
        .register(Method::GET, "/get-post", handlers::post::list)?
        .register(Method::GET, "/get-post/:id", handlers::post::get)?
        .register(Method::GET, "/delete-post/:id", handlers::post::delete)
}

async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            return AppError::ValidationFailure(format!("unreadable request body: {e}"))
                .into_response()
        }
    };
    let root_span = parts.extensions.get::<RootSpan>().cloned();

    state
        .routes
        .dispatch(
            DispatchRequest::new(parts.method, parts.uri, body).with_root_span(root_span),
            state.service.clone(),
        )
        .await
}

#[instrument(name = "build_app", skip_all)]
pub fn build_app(service: Service, settings: Settings) -> Result<Router, StartupError> {
    let routes = post_routes()?;
    for (method, pattern) in routes.routes() {
        info!(%method, %pattern, "serving route");
    }

    let state = AppState {
        service,
        routes: Arc::new(routes),
        max_body_bytes: settings.server.max_body_bytes,
    };

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(dispatch)
        .layer(from_fn(record_metrics))
        .layer(from_fn(trace_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_util::TestStorageBuilder;
    use axum::{body::Body, http::StatusCode};
    use tower::ServiceExt;

    async fn app() -> Router {
        app_with(Settings::from_file("test").unwrap()).await
    }

    async fn app_with(settings: Settings) -> Router {
        let builder = TestStorageBuilder::new();
        let (posts, _) = builder.build_post().await;
        let service = Service::new(posts, builder.build_flush(), &settings);
        build_app(service, settings).unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, String) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn every_documented_route_is_registered() {
        let routes = post_routes().unwrap();
        let registered: Vec<_> = routes
            .routes()
            .map(|(method, pattern)| (method.clone(), pattern.to_owned()))
            .collect();

        assert_eq!(registered.len(), 6);
        assert!(registered.contains(&(Method::GET, "/delete-post/:id".to_owned())));

        let doc = ApiDoc::openapi();
        for (_, pattern) in &registered {
            let documented = pattern.replace(":id", "{id}");
            assert!(
                doc.paths.paths.contains_key(&documented),
                "{documented} missing from OpenAPI document"
            );
        }
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = send(app().await, Method::GET, "/", Body::empty()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"data":"Server is up and running"}"#);
    }

    #[tokio::test]
    async fn create_from_body() {
        let (status, body) = send(
            app().await,
            Method::POST,
            "/create-post",
            Body::from(r#"{"title":"Hi","published":true,"description":"d"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let post: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(post["title"], "Hi");
        assert_eq!(post["description"], "d");
        assert_eq!(post["published"], true);
        assert!(!post["id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (status, body) =
            send(app().await, Method::POST, "/create-post", Body::from("{")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(r#""error":"validation_failure""#));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut settings = Settings::from_file("test").unwrap();
        settings.server.max_body_bytes = 8;

        let (status, body) = send(
            app_with(settings).await,
            Method::POST,
            "/create-post",
            Body::from(r#"{"title":"longer than eight"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(r#""error":"validation_failure""#));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, body) = send(app().await, Method::GET, "/update-post/1", Body::empty()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(r#""error":"route_not_found""#));
    }
}
