use axum::{
    body::Body,
    extract::Request,
    http::{Response, StatusCode},
    middleware::Next,
};

use opentelemetry::KeyValue;
use tokio::time::Instant;
use tracing::{debug, info_span, instrument};

use crate::{middleware::route_label, utils::metrics};

#[instrument(name = "middleware::record_metrics", skip_all)]
pub(crate) async fn record_metrics(
    request: Request,
    next: Next,
) -> Result<Response<Body>, StatusCode> {
    let method = request.method().to_string();

    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();

    let route = route_label(&response);
    let status = response.status();
    let status_str = status.as_str().to_string();
    let status_group = match status.as_u16() {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "unknown",
    };

    debug!(
        ?elapsed,
        %method,
        %route,
        %status_str,
        %status_group,
        "record_metrics: after next.run()"
    );

    let attributes = [
        KeyValue::new("method", method),
        KeyValue::new("route", route),
        KeyValue::new("status_group", status_group),
        KeyValue::new("http_status_code", status_str),
    ];

    info_span!("record http metrics").in_scope(|| {
        metrics::REQUEST_COUNTER.add(1.0, &attributes);
        metrics::HTTP_REQUEST_DURATION_HISTOGRAM.record(elapsed.as_millis() as f64, &attributes);
    });

    Ok(response)
}
