use tracing::{info, instrument, warn};

use crate::storage::sled::{
    error::SledStorageError,
    internal::{Key, KeyPrefix},
    BincodeConfig, FromBytesWithConfig, ToBytesWithConfig,
};

#[instrument(name = "sled::get_value_by_key", skip_all)]
pub(crate) fn get_value_with_span(
    key: &Key,
    tree: &sled::Tree,
) -> Result<sled::IVec, SledStorageError> {
    info!(key = %key, "get value with key");
    tree.get(key.as_bytes())?.ok_or(SledStorageError::NotFound)
}

/// Writes `value` only if `key` is vacant; never replaces a live record.
#[instrument(name = "sled::insert_new_value_with_key", skip_all)]
pub(crate) fn insert_new_value_with_span(
    key: &Key,
    value: &[u8],
    tree: &sled::Tree,
) -> Result<(), SledStorageError> {
    info!(key = %key, "insert new value with key");
    match tree.compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(value))? {
        Ok(()) => Ok(()),
        Err(_) => {
            warn!(key = %key, "key already taken");
            Err(SledStorageError::KeyCollision(key.to_string()))
        }
    }
}

/// Removes `key` and hands back what was stored under it, in one atomic step.
#[instrument(name = "sled::remove_value_with_key", skip_all)]
pub(crate) fn remove_value_with_span(
    key: &Key,
    tree: &sled::Tree,
) -> Result<sled::IVec, SledStorageError> {
    info!(key = %key, "remove value with key");
    tree.remove(key.as_bytes())?.ok_or_else(|| {
        warn!(key = %key, "Tried to remove non-existing key");
        SledStorageError::NotFound
    })
}

#[instrument(name = "sled::scan_prefix", skip_all)]
pub(crate) fn scan_prefix_with_span<T: FromBytesWithConfig<Error = SledStorageError>>(
    prefix: &KeyPrefix,
    tree: &sled::Tree,
    config: &BincodeConfig,
) -> Result<Vec<T>, SledStorageError> {
    let mut items = Vec::new();
    for item in tree.scan_prefix(prefix.as_bytes()) {
        let (key_bytes, value_bytes) = item?;
        let key = Key::from_bytes(&key_bytes)?;
        if key.prefix() != prefix {
            return Err(SledStorageError::InvalidKey(key.to_string()));
        }
        items.push(T::from_bytes(&value_bytes, config)?);
    }
    info!(prefix = %prefix, count = items.len(), "scanned values with key prefix");
    Ok(items)
}

#[instrument(name = "convert_bytes_to_value", skip_all)]
pub(crate) fn deserialize_in_span<T: FromBytesWithConfig<Error = SledStorageError>>(
    config: &BincodeConfig,
    bytes: &[u8],
) -> Result<T, SledStorageError> {
    T::from_bytes(bytes, config)
}

#[instrument(name = "convert_value_to_bytes", skip_all)]
pub(crate) fn serialize_in_span<T: ToBytesWithConfig<Error = SledStorageError>>(
    config: &BincodeConfig,
    value: &T,
) -> Result<Vec<u8>, SledStorageError> {
    value.to_bytes(config)
}

#[instrument(name = "flush_tree", skip_all)]
pub(crate) fn flush_tree_in_span(
    tree: &sled::Tree,
    tree_name: &'static str,
) -> Result<(), SledStorageError> {
    let bytes = tree.flush()?;
    info!(bytes = %bytes, tree_name = %tree_name, "flushed sled tree");

    Ok(())
}
