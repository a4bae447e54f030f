//! Lumen Core: response envelope, error codes, request ids, payload shapes,
//! and client-side envelope validation.

pub mod envelope;
pub mod payloads;
pub mod request_id;
pub mod validate;

pub use envelope::{now_iso8601, Envelope, ErrorCode, ErrorInfo, Metadata, API_VERSION};
pub use payloads::{ApiInfo, EchoReply, EchoRequest, HealthReport, MemoryUsage, HELLO_MESSAGE};
pub use request_id::{RequestId, CLIENT_PREFIX, REQUEST_ID_HEADER, SERVER_PREFIX};
pub use validate::{decode_body, decode_envelope, validate_envelope, DecodeError, PayloadPredicate};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
