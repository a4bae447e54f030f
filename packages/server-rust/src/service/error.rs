//! Failure type returned by endpoint work.

use std::any::Any;

use lumen_core::ErrorCode;
use serde_json::Value;

/// Message used when an unclassified failure carries no message of its own.
pub const DEFAULT_INTERNAL_MESSAGE: &str = "Internal Server Error";

/// A failure produced by an endpoint's unit of work.
///
/// `Classified` failures carry a recognized [`ErrorCode`]; everything else
/// (I/O failures, `anyhow` errors, panics) is `Unclassified` and maps to a
/// 500 `INTERNAL_ERROR`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{code}: {message}")]
    Classified {
        code: ErrorCode,
        message: String,
        details: Option<Value>,
    },
    #[error("{}", .message.as_deref().unwrap_or(DEFAULT_INTERNAL_MESSAGE))]
    Unclassified { message: Option<String> },
}

impl ApiError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError::Classified {
            code,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::VALIDATION_ERROR, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NOT_FOUND, message)
    }

    /// A body that failed to parse at the decoding stage.
    #[must_use]
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_JSON, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Unclassified {
            message: Some(message.into()),
        }
    }

    /// Attaches structured details. Unclassified failures carry none.
    #[must_use]
    pub fn with_details(self, details: Value) -> Self {
        match self {
            ApiError::Classified { code, message, .. } => ApiError::Classified {
                code,
                message,
                details: Some(details),
            },
            unclassified @ ApiError::Unclassified { .. } => unclassified,
        }
    }

    /// Converts a caught panic payload into an unclassified failure.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        ApiError::Unclassified { message }
    }

    /// The failure's own message, if it has one.
    #[must_use]
    pub fn own_message(&self) -> Option<&str> {
        match self {
            ApiError::Classified { message, .. } => Some(message),
            ApiError::Unclassified { message } => message.as_deref(),
        }
    }

    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Classified { details, .. } => details.as_ref(),
            ApiError::Unclassified { .. } => None,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal(err.to_string())
    }
}
