//! Response envelope shared by every Lumen endpoint.
//!
//! The wire shape is a tagged union discriminated by a boolean `status`
//! field rather than a string tag, so `Envelope` implements `Serialize` and
//! `Deserialize` by hand. All structs use `#[serde(rename_all = "camelCase")]`
//! to match the JSON the frontend consumes.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// API version reported in every envelope's metadata.
pub const API_VERSION: &str = "1.0.0";

/// Returns the current UTC time as ISO-8601 with millisecond precision.
#[must_use]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Per-response metadata attached to both success and error envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Assembly time of the envelope, ISO-8601 UTC.
    pub timestamp: String,
    /// Correlation identifier of the request that produced this envelope.
    pub request_id: String,
    /// API version string.
    pub version: String,
    /// Milliseconds between work start and envelope assembly.
    pub execution_time: u64,
}

impl Metadata {
    /// Creates metadata stamped with the current time and `execution_time = 0`.
    #[must_use]
    pub fn new(request_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            timestamp: now_iso8601(),
            request_id: request_id.into(),
            version: version.into(),
            execution_time: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

/// Closed set of machine-readable error codes.
///
/// Variant names use `SCREAMING_CASE` to match the wire format exactly.
/// A code outside this set fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    VALIDATION_ERROR,
    NOT_FOUND,
    UNAUTHORIZED,
    FORBIDDEN,
    CONFLICT,
    INVALID_JSON,
    INTERNAL_ERROR,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::VALIDATION_ERROR,
        ErrorCode::NOT_FOUND,
        ErrorCode::UNAUTHORIZED,
        ErrorCode::FORBIDDEN,
        ErrorCode::CONFLICT,
        ErrorCode::INVALID_JSON,
        ErrorCode::INTERNAL_ERROR,
    ];

    /// Returns the wire representation of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::VALIDATION_ERROR => "VALIDATION_ERROR",
            ErrorCode::NOT_FOUND => "NOT_FOUND",
            ErrorCode::UNAUTHORIZED => "UNAUTHORIZED",
            ErrorCode::FORBIDDEN => "FORBIDDEN",
            ErrorCode::CONFLICT => "CONFLICT",
            ErrorCode::INVALID_JSON => "INVALID_JSON",
            ErrorCode::INTERNAL_ERROR => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure description carried by an error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Uniform success/error wrapper returned by every endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success { payload: T, metadata: Metadata },
    Error { error: ErrorInfo, metadata: Metadata },
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn success(payload: T, metadata: Metadata) -> Self {
        Envelope::Success { payload, metadata }
    }

    #[must_use]
    pub fn error(error: ErrorInfo, metadata: Metadata) -> Self {
        Envelope::Error { error, metadata }
    }

    /// Mirrors the wire `status` field.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        match self {
            Envelope::Success { metadata, .. } | Envelope::Error { metadata, .. } => metadata,
        }
    }

    /// Unwraps the payload, or returns the error info of a failed envelope.
    ///
    /// # Errors
    ///
    /// Returns the envelope's `ErrorInfo` when `status` is `false`.
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match self {
            Envelope::Success { payload, .. } => Ok(payload),
            Envelope::Error { error, .. } => Err(error),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 3)?;
        match self {
            Envelope::Success { payload, metadata } => {
                state.serialize_field("status", &true)?;
                state.serialize_field("payload", payload)?;
                state.serialize_field("metadata", metadata)?;
            }
            Envelope::Error { error, metadata } => {
                state.serialize_field("status", &false)?;
                state.serialize_field("error", error)?;
                state.serialize_field("metadata", metadata)?;
            }
        }
        state.end()
    }
}

/// Flat view of the wire shape used while deserializing.
#[derive(Deserialize)]
struct RawEnvelope<T> {
    status: bool,
    payload: Option<T>,
    error: Option<ErrorInfo>,
    metadata: Metadata,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;
        match (raw.status, raw.payload, raw.error) {
            (true, Some(payload), _) => Ok(Envelope::Success {
                payload,
                metadata: raw.metadata,
            }),
            (true, None, _) => Err(D::Error::missing_field("payload")),
            (false, _, Some(error)) => Ok(Envelope::Error {
                error,
                metadata: raw.metadata,
            }),
            (false, _, None) => Err(D::Error::missing_field("error")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
