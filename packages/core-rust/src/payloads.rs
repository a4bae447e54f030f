//! Payload shapes carried inside success envelopes.
//!
//! Each struct is the `payload` of one endpoint. Field names are camelCase
//! on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of `GET /hello`.
pub const HELLO_MESSAGE: &str = "Hello World!";

/// Process and host memory figures, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    /// Resident set size of the server process.
    pub rss: u64,
    /// Virtual memory size of the server process.
    pub virtual_memory: u64,
    pub system_total: u64,
    pub system_used: u64,
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Always `"healthy"` when the endpoint answers at all.
    pub status: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub timestamp: String,
    pub memory: MemoryUsage,
    pub version: String,
}

/// Payload of `GET /` (API root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Route path -> human description.
    pub endpoints: BTreeMap<String, String>,
    pub features: Vec<String>,
}

/// Request body of `POST /echo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Map<String, Value>>,
}

impl EchoRequest {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }
}

/// Payload of `POST /echo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoReply {
    pub original_message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub received_data: Option<Map<String, Value>>,
    pub timestamp: String,
    pub request_id: String,
    pub method: String,
}
