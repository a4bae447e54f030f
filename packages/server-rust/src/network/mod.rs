//! HTTP surface: configuration, middleware, request context, handlers,
//! and server lifecycle.

pub mod config;
pub mod context;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod module;
pub mod request_id;

pub use config::NetworkConfig;
pub use context::RequestContext;
pub use extract::JsonBody;
pub use handlers::AppState;
pub use module::{build_router, NetworkModule};
