//! Client failure type.

use lumen_core::{DecodeError, ErrorInfo};

/// Why an API call did not produce a payload.
///
/// Transport, envelope decoding, and server-reported failures are kept
/// apart so callers can react to each differently.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived but was not a valid envelope of the expected shape.
    #[error("invalid response: {0}")]
    Decode(#[from] DecodeError),

    /// The server answered with an error envelope.
    #[error("API error {status}: {} ({})", .error.message, .error.code)]
    Api { status: u16, error: ErrorInfo },
}

impl ClientError {
    /// The server-reported error, if this is an API failure.
    #[must_use]
    pub fn api_error(&self) -> Option<&ErrorInfo> {
        match self {
            ClientError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}
