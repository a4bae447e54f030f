//! HTTP handler definitions for the Lumen server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod echo;
pub mod fallback;
pub mod health;
pub mod hello;
pub mod info;

pub use echo::echo_handler;
pub use fallback::not_found_handler;
pub use health::health_handler;
pub use hello::hello_handler;
pub use info::info_handler;

use std::sync::Arc;
use std::time::Instant;

use crate::service::{ApiConfig, EndpointExecutor};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// API identity, prefix, and thresholds.
    pub config: Arc<ApiConfig>,
    /// Envelope assembly shared by every endpoint.
    pub executor: EndpointExecutor,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        let executor = EndpointExecutor::new(&config.version);
        Self {
            config: Arc::new(config),
            executor,
            start_time: Instant::now(),
        }
    }
}
