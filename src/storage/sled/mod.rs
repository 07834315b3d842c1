pub(super) mod error;
mod flush_impl;
mod internal;
mod posts_impl;

#[cfg(any(test, feature = "integration_tests"))]
pub mod test_util;

use super::{NewPost, Post, PostId, PostStorage, PostVersion, StorageError};
use crate::{config::types::SledConfig, utils::measure_metrics::measure_and_record_storage};
use bincode::config::{self};
use error::{SledStartupError, SledStorageError};
use internal::{Key, KeyPrefix, PrefixKind};
use tracing::{info_span, instrument};

pub(crate) static SLED_POST_TREE: &str = "posts";
const BINCODE_CONFIG: config::Configuration = config::standard()
    .with_variable_int_encoding()
    .with_little_endian();

use bincode::{Decode, Encode};

type BincodeConfig = bincode::config::Configuration;

trait ToBytesWithConfig: Encode {
    type Error;

    fn to_bytes(&self, config: &BincodeConfig) -> Result<Vec<u8>, Self::Error>;
}

trait FromBytesWithConfig: Decode<()> {
    type Error;

    fn from_bytes(bytes: &[u8], config: &BincodeConfig) -> Result<Self, Self::Error>;
}

/// Sled-backed post store. The underlying `Db` is opened once per process
/// and shared by every request; `sled::Tree` handles are `Arc`s internally.
pub(crate) struct SledStorage {
    post_tree: sled::Tree,
    bincode_config: config::Configuration,
}

impl SledStorage {
    #[instrument(name = "Storage::new")]
    pub fn new(sled_config: &SledConfig) -> Result<Self, SledStartupError> {
        measure_and_record_storage("Storage::new", || {
            let db = info_span!("sled::open_db").in_scope(|| {
                sled::Config::default()
                    .path(&sled_config.path)
                    .temporary(sled_config.temporary)
                    .open()
                    .map_err(|e| {
                        tracing::error!(error = %e, path = ?sled_config.path, "failed to open db");
                        SledStartupError::OpenSledStorageError(e)
                    })
            })?;

            Self::from_db(&db)
        })
    }

    pub(crate) fn from_db(db: &sled::Db) -> Result<Self, SledStartupError> {
        let post_tree = info_span!("sled::open_post_tree").in_scope(|| {
            db.open_tree(SLED_POST_TREE).map_err(|e| {
                tracing::error!(error = %e, tree_name = SLED_POST_TREE, "failed to open post tree");
                SledStartupError::OpenSledStorageError(e)
            })
        })?;

        Ok(Self {
            post_tree,
            bincode_config: BINCODE_CONFIG,
        })
    }
}

fn post_key(post_id: &PostId) -> Key {
    Key::new(KeyPrefix::from_kind(PrefixKind::Post), post_id)
}

impl FromBytesWithConfig for PostVersion {
    type Error = SledStorageError;

    #[instrument(name = "PostVersion::from_bytes", skip_all)]
    fn from_bytes(bytes: &[u8], config: &BincodeConfig) -> Result<Self, Self::Error> {
        let (post, _len) = bincode::decode_from_slice::<PostVersion, _>(bytes, *config)?;
        Ok(post)
    }
}

impl ToBytesWithConfig for PostVersion {
    type Error = SledStorageError;

    #[instrument(name = "PostVersion::to_bytes", skip_all)]
    fn to_bytes(&self, config: &BincodeConfig) -> Result<Vec<u8>, Self::Error> {
        Ok(bincode::encode_to_vec(self, *config)?)
    }
}
