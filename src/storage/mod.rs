mod error;
mod ids;
mod post;
mod sled;

#[cfg(any(test, feature = "integration_tests"))]
pub use sled::test_util;
pub(crate) use sled::{error::SledStartupError, SledStorage};
#[cfg(test)]
pub(crate) use sled::error::SledStorageError;

use async_trait::async_trait;
pub(crate) use error::StorageError;
pub use ids::PostId;
pub(crate) use post::PostVersion;
pub use post::{NewPost, Post};

/// Persistence contract the post handlers rely on.
///
/// Every operation is a single atomic store call: a request that is dropped
/// mid-flight never leaves a half-written record behind.
#[async_trait]
pub trait PostStorage: Send + Sync {
    async fn create(&self, fields: NewPost) -> Result<Post, StorageError>;
    async fn find_all(&self) -> Result<Vec<Post>, StorageError>;
    async fn find_by_id(&self, id: PostId) -> Result<Post, StorageError>;
    async fn delete_by_id(&self, id: PostId) -> Result<Post, StorageError>;
}

#[async_trait]
pub trait FlushStorage: Send + Sync {
    async fn flush(&self) -> Result<(), StorageError>;
}
