use std::sync::Arc;

use tracing::{info, instrument};

use super::retry::ReadRetryPolicy;
use crate::{
    config::types::PostDefaults,
    handlers::{error::AppError, CreatePost},
    storage::{Post, PostId, PostStorage},
    utils::measure_metrics::measure_and_record_service,
};

pub struct ServicePostRef {
    storage: Arc<dyn PostStorage>,
    read_retry: ReadRetryPolicy,
    defaults: Arc<PostDefaults>,
}

impl ServicePostRef {
    pub(crate) fn new(
        storage: Arc<dyn PostStorage>,
        read_retry: ReadRetryPolicy,
        defaults: Arc<PostDefaults>,
    ) -> Self {
        Self {
            storage,
            read_retry,
            defaults,
        }
    }

    #[instrument(name = "Service::post::create", skip_all)]
    pub(crate) async fn create(&self, input: CreatePost) -> Result<Post, AppError> {
        let fields = input.resolve(&self.defaults)?;

        measure_and_record_service("create_post", || async {
            self.storage.create(fields).await
        })
        .await
        .map_err(Into::into)
    }

    #[instrument(name = "Service::post::find_all", skip_all)]
    pub(crate) async fn find_all(&self) -> Result<Vec<Post>, AppError> {
        measure_and_record_service("find_all_posts", || async {
            self.read_retry
                .run("find_all_posts", || self.storage.find_all())
                .await
        })
        .await
        .map_err(Into::into)
    }

    #[instrument(name = "Service::post::find_by_id", skip_all)]
    pub(crate) async fn find_by_id(&self, id: PostId) -> Result<Post, AppError> {
        info!(post_id = %id, "find post");

        measure_and_record_service("find_post", || async {
            self.read_retry
                .run("find_post", || self.storage.find_by_id(id))
                .await
        })
        .await
        .map_err(Into::into)
    }

    #[instrument(name = "Service::post::delete_by_id", skip_all)]
    pub(crate) async fn delete_by_id(&self, id: PostId) -> Result<Post, AppError> {
        info!(post_id = %id, "delete post");

        measure_and_record_service("delete_post", || async {
            self.storage.delete_by_id(id).await
        })
        .await
        .map_err(Into::into)
    }
}
