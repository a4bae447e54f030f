//! Lumen server: a small JSON API where every response, success or failure,
//! is wrapped in the same envelope.

pub mod network;
pub mod service;
pub mod telemetry;

pub use network::{build_router, AppState, NetworkConfig, NetworkModule};
pub use service::{ApiConfig, ApiError, EndpointExecutor};
