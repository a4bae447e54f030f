//! Envelope pipeline: failure type, classification, and endpoint execution.
//!
//! 1. **Errors** (`error`): `ApiError`, the failure any endpoint work returns
//! 2. **Classification** (`classify`): `ApiError` -> status, code, user message
//! 3. **Execution** (`executor`): runs work, catches panics, assembles the envelope
//! 4. **Configuration** (`config`): API identity, prefix, and thresholds

pub mod classify;
pub mod config;
pub mod error;
pub mod executor;

pub use classify::{classify, describe, Classification};
pub use config::ApiConfig;
pub use error::ApiError;
pub use executor::{ApiReply, EndpointExecutor};
