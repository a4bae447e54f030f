//! Network module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` stores configuration,
//! `start()` binds the TCP listener, and `serve()` starts accepting
//! connections. Binding separately lets callers learn the OS-assigned port
//! before traffic flows.

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{
    echo_handler, health_handler, hello_handler, info_handler, not_found_handler, AppState,
};
use super::middleware::build_http_layers;
use crate::service::ApiConfig;

/// Assembles the axum router with all routes and middleware.
///
/// Routes, relative to the configured prefix:
/// - `GET /hello` -- greeting
/// - `GET /health` -- health report
/// - `GET` on the prefix itself (with or without trailing slash) -- API info
/// - `POST /echo` -- echo
///
/// Unmatched paths and unmatched methods on known paths both answer 404.
pub fn build_router(state: AppState, network: &NetworkConfig) -> Router {
    let api = state.config.clone();
    let layers = build_http_layers(network, &api);

    let mut router = Router::new()
        .route(&api.path("/hello"), get(hello_handler))
        .route(&api.path("/health"), get(health_handler))
        .route(&api.root_path(), get(info_handler))
        .route(&api.path("/echo"), post(echo_handler));

    let slash_root = api.path("/");
    if slash_root != api.root_path() {
        router = router.route(&slash_root, get(info_handler));
    }

    router
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
        .layer(layers)
        .with_state(state)
}

/// Manages the HTTP server lifecycle.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- stores configuration
/// 2. `start()` -- binds TCP listener to the configured address
/// 3. `serve()` -- begins accepting connections until shutdown is signalled
pub struct NetworkModule {
    config: NetworkConfig,
    api: ApiConfig,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, api: ApiConfig) -> Self {
        Self {
            config,
            api,
            listener: None,
        }
    }

    /// Builds a router over fresh application state.
    pub fn build_router(&self) -> Router {
        build_router(AppState::new(self.api.clone()), &self.config)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the shutdown future resolves, then lets
    /// in-flight requests finish.
    ///
    /// Consumes `self` because the listener is moved into the server.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first, or if the server
    /// encounters a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;

        info!(
            prefix = %self.api.root_path(),
            version = %self.api.version,
            "Serving HTTP connections"
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        info!("Server stopped");
        Ok(())
    }
}
