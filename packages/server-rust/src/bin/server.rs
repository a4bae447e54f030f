//! Lumen API server binary.

use std::time::Duration;

use clap::Parser;
use lumen_server::telemetry::{init_tracing, LogFormat};
use lumen_server::{ApiConfig, NetworkConfig, NetworkModule};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "lumen-server", version, about = "Lumen API server")]
struct Args {
    /// Bind address.
    #[arg(long, env = "LUMEN_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port. 0 picks a free port.
    #[arg(long, env = "LUMEN_PORT", default_value_t = 3001)]
    port: u16,

    /// Allowed CORS origins, comma separated. `*` allows any origin.
    #[arg(long, env = "LUMEN_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    /// Path prefix for all endpoints.
    #[arg(long, env = "LUMEN_API_PREFIX", default_value = "/api")]
    api_prefix: String,

    /// Requests slower than this many milliseconds are logged as slow.
    #[arg(long, env = "LUMEN_SLOW_REQUEST_MS", default_value_t = 1000)]
    slow_request_ms: u64,

    /// Log output format.
    #[arg(long, env = "LUMEN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format)?;

    let network = NetworkConfig {
        host: args.host,
        port: args.port,
        cors_origins: args.cors_origins,
    };
    let api = ApiConfig {
        prefix: args.api_prefix,
        slow_request_threshold: Duration::from_millis(args.slow_request_ms),
        ..ApiConfig::default()
    };

    let mut module = NetworkModule::new(network, api);
    let port = module.start().await?;
    info!(port, "Lumen server listening");

    module.serve(shutdown_signal()).await
}

/// Resolves on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
