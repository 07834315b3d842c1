use post_api::{MetricsProviderGuard, Settings, StartupError, TracingProviderGuard};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[derive(Debug, Error)]
enum PostApiError {
    #[error("Startup error")]
    Startup(#[from] StartupError),

    #[error("Io error")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), PostApiError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .max_blocking_threads(num_cpus::get() * 2)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

#[cfg(unix)]
async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            error!(error = %e, "failed to bind to SIGTERM, waiting for SIGINT only");
            let _ = signal::ctrl_c().await;
            info!("SIGINT received");
            return;
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM received");
        },
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("SIGINT received");
}

async fn async_main() -> Result<(), PostApiError> {
    let settings = Settings::new()?;

    let tracing_provider_guard = settings
        .tracing_enabled()
        .then(|| TracingProviderGuard::new(&settings))
        .transpose()?;

    if tracing_provider_guard.is_none() && settings.stdout_tracing_enabled() {
        post_api::init_stdout_tracing(&settings)?;
    }

    let _metrics_provider_guard = settings
        .metrics_enabled()
        .then(|| MetricsProviderGuard::new(&settings))
        .transpose()?;

    let server_addr = settings.server_addr();
    let (app, service) = post_api::init_app(settings).await?;

    let listener = TcpListener::bind(&server_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = service.flush_storage().await {
        error!(error = %e, "failed to flush storage on shutdown");
    }

    Ok(())
}
