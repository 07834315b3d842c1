use crate::{
    config::types::StorageKind,
    service::Service,
    storage::{FlushStorage, PostStorage},
    Settings,
};
use std::sync::Arc;

use tracing::instrument;

use crate::storage::SledStorage;

use super::StartupError;

/// Opens the configured store once for the whole process.
#[instrument(name = "init_storage", skip_all)]
pub async fn init_storage(settings: &Settings) -> Result<Service, StartupError> {
    match &settings.storage.backend {
        StorageKind::Sled => {
            let sled_storage = Arc::new(
                SledStorage::new(
                    settings
                        .storage
                        .sled
                        .as_ref()
                        .ok_or(StartupError::MissingStorageConfig("sled".to_string()))?,
                )
                .map_err(StartupError::OpenSledStorage)?,
            );

            Ok(Service::new(
                sled_storage.clone() as Arc<dyn PostStorage>,
                sled_storage as Arc<dyn FlushStorage>,
                settings,
            ))
        }
        kind => Err(StartupError::UnsupportedStorage(kind.as_ref().to_string())),
    }
}
