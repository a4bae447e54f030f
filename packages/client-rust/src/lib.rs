//! Lumen client: typed access to the Lumen API. Every response envelope is
//! validated before its payload reaches the caller.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_PREFIX};
pub use error::ClientError;
