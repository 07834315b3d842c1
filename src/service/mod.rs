pub(crate) mod post;
pub(crate) mod retry;

use std::sync::Arc;

use crate::{
    config::types::PostDefaults,
    storage::{FlushStorage, PostStorage},
    utils::measure_metrics::measure_and_record_service,
    Settings,
};
use post::ServicePostRef;
use retry::ReadRetryPolicy;
use tracing::instrument;

use crate::handlers::error::AppError;

/// Shared handle to the store, cloned into every request.
#[derive(Clone)]
pub struct Service {
    post_storage: Arc<dyn PostStorage>,
    flush_storage: Arc<dyn FlushStorage>,
    read_retry: ReadRetryPolicy,
    post_defaults: Arc<PostDefaults>,
}

impl Service {
    #[instrument(name = "Service::new", skip_all)]
    pub fn new(
        post_storage: Arc<dyn PostStorage>,
        flush_storage: Arc<dyn FlushStorage>,
        settings: &Settings,
    ) -> Self {
        Self {
            post_storage,
            flush_storage,
            read_retry: ReadRetryPolicy::from_settings(&settings.storage),
            post_defaults: Arc::new(settings.posts.defaults.clone()),
        }
    }

    pub fn post(&self) -> ServicePostRef {
        ServicePostRef::new(
            self.post_storage.clone(),
            self.read_retry,
            self.post_defaults.clone(),
        )
    }

    pub async fn flush_storage(&self) -> Result<(), AppError> {
        measure_and_record_service("flush_storage", || async {
            self.flush_storage.flush().await.map_err(Into::into)
        })
        .await
    }
}
