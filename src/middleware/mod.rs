pub(crate) mod metrics;
pub(crate) mod trace_root;

use axum::http::Response;

use crate::dispatch::MatchedRoute;

/// Route pattern label for a finished request. Raw paths would put every post
/// id into its own label value.
pub(crate) fn route_label<B>(response: &Response<B>) -> String {
    response
        .extensions()
        .get::<MatchedRoute>()
        .map(|route| route.0.clone())
        .unwrap_or_else(|| "unmatched".to_string())
}

#[cfg(test)]
mod tests {
    use super::route_label;
    use crate::dispatch::MatchedRoute;
    use axum::http::Response;

    #[test]
    fn route_label_uses_matched_pattern() {
        let mut response = Response::new(());
        assert_eq!(route_label(&response), "unmatched");

        response
            .extensions_mut()
            .insert(MatchedRoute("/delete-post/:id".to_string()));
        assert_eq!(route_label(&response), "/delete-post/:id");
    }
}
