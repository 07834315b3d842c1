use crate::storage::PostId;
use crate::trace_err;
use crate::utils::blocking_task_guard::BlockingTaskGuard;
use crate::utils::measure_metrics::measure_and_record_storage;

use super::error::SledStorageError;
use super::internal::{
    span_wrappers::{
        deserialize_in_span, get_value_with_span, insert_new_value_with_span,
        remove_value_with_span, scan_prefix_with_span, serialize_in_span,
    },
    KeyPrefix, PrefixKind,
};
use super::{post_key, BincodeConfig, SledStorage};
use super::{NewPost, Post, PostStorage, PostVersion, StorageError};
use async_trait::async_trait;
use sled::Tree;
use tracing::{info, info_span, instrument, Span};

#[async_trait]
impl PostStorage for SledStorage {
    #[instrument(name = "SledStorage::create_post", skip_all)]
    async fn create(&self, fields: NewPost) -> Result<Post, StorageError> {
        let post = Post::new(PostId::new(), fields);
        info!(post_id = %post.id, "create post");

        measure_and_record_storage("SledStorage::create_post", || {
            let key = post_key(&post.id);

            let encoded: Vec<u8> = trace_err!(
                serialize_in_span(&self.bincode_config, &PostVersion::from(post.clone())),
                "failed to bin encode post"
            )?;

            trace_err!(
                insert_new_value_with_span(&key, &encoded, &self.post_tree),
                "failed to write post into storage"
            )
        })
        .map_err(StorageError::from)?;

        Ok(post)
    }

    #[instrument(name = "SledStorage::find_all_posts", skip_all)]
    async fn find_all(&self) -> Result<Vec<Post>, StorageError> {
        // cloning tree should be cheap: struct Tree{inner: Arc<TreeInner>}
        let (post_tree, bincode_config) = info_span!("Cloning tree and config")
            .in_scope(|| (self.post_tree.clone(), self.bincode_config));

        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _guard = BlockingTaskGuard::new("find_all_posts");
            span.in_scope(|| find_all_posts(&post_tree, &bincode_config))
        })
        .await?
    }

    #[instrument(name = "SledStorage::find_post", skip_all)]
    async fn find_by_id(&self, post_id: PostId) -> Result<Post, StorageError> {
        info!(post_id = %post_id, "find post");

        measure_and_record_storage("SledStorage::find_post", || {
            let key = post_key(&post_id);

            let value = trace_err!(
                get_value_with_span(&key, &self.post_tree),
                "failed to read post from storage"
            )?;

            Ok::<Post, SledStorageError>(
                trace_err!(
                    deserialize_in_span::<PostVersion>(&self.bincode_config, &value),
                    "failed to bin decode post"
                )?
                .into(),
            )
        })
        .map_err(Into::into)
    }

    #[instrument(name = "SledStorage::delete_post", skip_all)]
    async fn delete_by_id(&self, post_id: PostId) -> Result<Post, StorageError> {
        info!(post_id = %post_id, "delete post");

        measure_and_record_storage("SledStorage::delete_post", || {
            let key = post_key(&post_id);

            let removed = trace_err!(
                remove_value_with_span(&key, &self.post_tree),
                "failed to remove post from storage"
            )?;

            Ok::<Post, SledStorageError>(
                trace_err!(
                    deserialize_in_span::<PostVersion>(&self.bincode_config, &removed),
                    "failed to bin decode removed post"
                )?
                .into(),
            )
        })
        .map_err(Into::into)
    }
}

#[instrument(name = "SledStorage::find_all_posts_blocking", skip_all)]
fn find_all_posts(
    post_tree: &Tree,
    bincode_config: &BincodeConfig,
) -> Result<Vec<Post>, StorageError> {
    measure_and_record_storage("SledStorage::find_all_posts", || {
        let versions = trace_err!(
            scan_prefix_with_span::<PostVersion>(
                &KeyPrefix::from_kind(PrefixKind::Post),
                post_tree,
                bincode_config,
            ),
            "failed to scan posts"
        )?;

        Ok::<Vec<Post>, SledStorageError>(versions.into_iter().map(Post::from).collect())
    })
    .map_err(Into::into)
}

#[cfg(test)]
mod tests;
