mod observability;
mod storage;

use crate::{dispatch::RouteError, storage::SledStartupError};
use thiserror::Error;

pub use observability::{init_metrics_provider, init_stdout_tracing, init_tracer_provider};
pub use storage::init_storage;

/// Anything that stops the process before it starts listening.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to open sled storage")]
    OpenSledStorage(#[from] SledStartupError),

    #[error("Unsupported storage kind: {0}")]
    UnsupportedStorage(String),

    #[error("Missing storage config: {0}")]
    MissingStorageConfig(String),

    #[error("Invalid route table")]
    Routes(#[from] RouteError),

    #[error("Failed to load configs")]
    LoadConfig(#[from] config::ConfigError),

    #[error("Failed to init OTLP exporter")]
    InitExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("Failed to bridge log records into tracing")]
    InitLogTracer(#[from] tracing_log::log::SetLoggerError),

    #[error("Failed to set global tracing subscriber")]
    SetGlobalTracingProvider(#[from] tracing::subscriber::SetGlobalDefaultError),
}
