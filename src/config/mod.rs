pub(crate) mod types;

use std::net::SocketAddr;

use config::{Config, Environment, File};
use serde::Deserialize;
pub(crate) use types::{PostSettings, ServerConfig, StorageSettings, TelemetryConfig};

use crate::{init::StartupError, trace_err};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub(crate) storage: StorageSettings,
    pub(crate) telemetry: TelemetryConfig,
    pub(crate) server: ServerConfig,
    #[serde(default)]
    pub(crate) posts: PostSettings,
}

impl Settings {
    pub fn new() -> Result<Self, StartupError> {
        dotenv::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or("development".into());

        Settings::from_file(&run_mode)
    }

    /// Layers `config/default`, `config/<file_name>` and `APP__*` env vars.
    pub fn from_file(file_name: &str) -> Result<Self, StartupError> {
        trace_err!(
            Config::builder()
                .add_source(File::with_name("config/default"))
                .add_source(File::with_name(&format!("config/{file_name}")).required(false))
                .add_source(Environment::with_prefix("APP").separator("__"))
                .build()?
                .try_deserialize(),
            "failed to build app settings"
        )
        .map_err(Into::into)
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server.addr
    }

    pub fn tracing_enabled(&self) -> bool {
        self.telemetry.tracing
    }

    pub fn metrics_enabled(&self) -> bool {
        self.telemetry.metrics
    }

    pub fn stdout_tracing_enabled(&self) -> bool {
        self.telemetry.stdout_tracing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::StorageKind;

    #[test]
    fn test_settings_load() {
        let settings = Settings::from_file("test").unwrap();

        assert!(matches!(settings.storage.backend, StorageKind::Sled));
        assert!(settings.storage.sled.as_ref().unwrap().temporary);
        assert!(!settings.tracing_enabled());
        assert!(!settings.metrics_enabled());
        assert_eq!(settings.posts.defaults.published, Some(false));
    }

    #[test]
    fn missing_run_mode_file_falls_back_to_default() {
        let settings = Settings::from_file("no-such-mode").unwrap();

        assert_eq!(settings.server_addr().port(), 8080);
        assert!(settings.posts.defaults.title.is_none());
    }
}
