//! Client-side envelope validation.
//!
//! A received body is checked before its payload is handed to callers:
//! it must be an object with a boolean `status`, and on success the payload
//! must satisfy the caller's shape predicate. Anything else is a
//! [`DecodeError`], never a pass-through.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::envelope::Envelope;

/// Shape check applied to a success payload.
pub type PayloadPredicate = fn(&Value) -> bool;

/// Reasons a received envelope is rejected before reaching callers.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("response has no status field")]
    MissingStatus,
    #[error("response status field is not a boolean")]
    StatusNotBoolean,
    #[error("response payload does not match the expected shape")]
    PayloadShape,
    #[error("response envelope is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Checks the envelope shape of a raw received value.
///
/// A success envelope without a payload is checked as if the payload were
/// `null`, so a supplied predicate decides whether that is acceptable.
///
/// # Errors
///
/// Returns the first failed check as a [`DecodeError`].
pub fn validate_envelope(raw: &Value, predicate: Option<PayloadPredicate>) -> Result<(), DecodeError> {
    let obj = raw.as_object().ok_or(DecodeError::NotAnObject)?;
    let status = obj
        .get("status")
        .ok_or(DecodeError::MissingStatus)?
        .as_bool()
        .ok_or(DecodeError::StatusNotBoolean)?;

    if let (true, Some(check)) = (status, predicate) {
        let payload = obj.get("payload").unwrap_or(&Value::Null);
        if !check(payload) {
            return Err(DecodeError::PayloadShape);
        }
    }
    Ok(())
}

/// Validates `raw` and then deserializes it into a typed envelope.
///
/// # Errors
///
/// Returns a [`DecodeError`] if validation fails or the value does not
/// deserialize into `Envelope<T>` (including unknown error codes).
pub fn decode_envelope<T: DeserializeOwned>(
    raw: Value,
    predicate: Option<PayloadPredicate>,
) -> Result<Envelope<T>, DecodeError> {
    validate_envelope(&raw, predicate)?;
    serde_json::from_value(raw).map_err(DecodeError::Malformed)
}

/// Parses a response body and decodes it as an envelope.
///
/// # Errors
///
/// Returns [`DecodeError::Json`] for unparseable bodies, otherwise as
/// [`decode_envelope`].
pub fn decode_body<T: DeserializeOwned>(
    body: &[u8],
    predicate: Option<PayloadPredicate>,
) -> Result<Envelope<T>, DecodeError> {
    let raw: Value = serde_json::from_slice(body).map_err(DecodeError::Json)?;
    decode_envelope(raw, predicate)
}

// ---------------------------------------------------------------------------
// Payload shape predicates
// ---------------------------------------------------------------------------

#[must_use]
pub fn is_hello_payload(payload: &Value) -> bool {
    payload.is_string()
}

#[must_use]
pub fn is_echo_payload(payload: &Value) -> bool {
    payload.get("originalMessage").is_some_and(Value::is_string)
}

#[must_use]
pub fn is_health_payload(payload: &Value) -> bool {
    payload.get("status").is_some_and(Value::is_string)
        && payload.get("uptime").is_some_and(Value::is_number)
        && payload.get("timestamp").is_some_and(Value::is_string)
        && payload.get("memory").is_some_and(Value::is_object)
        && payload.get("version").is_some_and(Value::is_string)
}

#[must_use]
pub fn is_api_info_payload(payload: &Value) -> bool {
    payload.get("name").is_some_and(Value::is_string)
        && payload.get("version").is_some_and(Value::is_string)
        && payload.get("description").is_some_and(Value::is_string)
        && payload.get("endpoints").is_some_and(Value::is_object)
        && payload
            .get("features")
            .and_then(Value::as_array)
            .is_some_and(|features| features.iter().all(Value::is_string))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::envelope::ErrorCode;

    fn metadata() -> Value {
        json!({
            "timestamp": "2026-01-01T00:00:00.000Z",
            "requestId": "req_1_a",
            "version": "1.0.0",
            "executionTime": 0,
        })
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(
            validate_envelope(&json!([1, 2]), None),
            Err(DecodeError::NotAnObject)
        ));
        assert!(matches!(
            validate_envelope(&Value::Null, None),
            Err(DecodeError::NotAnObject)
        ));
    }

    #[test]
    fn rejects_missing_or_non_boolean_status() {
        assert!(matches!(
            validate_envelope(&json!({ "payload": "x" }), None),
            Err(DecodeError::MissingStatus)
        ));
        assert!(matches!(
            validate_envelope(&json!({ "status": "true" }), None),
            Err(DecodeError::StatusNotBoolean)
        ));
    }

    #[test]
    fn applies_predicate_only_on_success() {
        let ok = json!({ "status": true, "payload": 5, "metadata": metadata() });
        assert!(matches!(
            validate_envelope(&ok, Some(is_hello_payload)),
            Err(DecodeError::PayloadShape)
        ));

        let failed = json!({
            "status": false,
            "error": { "code": "NOT_FOUND", "message": "Resource not found" },
            "metadata": metadata(),
        });
        assert!(validate_envelope(&failed, Some(is_hello_payload)).is_ok());
    }

    #[test]
    fn missing_payload_fails_predicate() {
        let raw = json!({ "status": true, "metadata": metadata() });
        assert!(matches!(
            validate_envelope(&raw, Some(is_echo_payload)),
            Err(DecodeError::PayloadShape)
        ));
    }

    #[test]
    fn decodes_typed_success() {
        let raw = json!({ "status": true, "payload": "Hello World!", "metadata": metadata() });
        let env: Envelope<String> = decode_envelope(raw, Some(is_hello_payload)).unwrap();
        assert_eq!(env.into_result().unwrap(), "Hello World!");
    }

    #[test]
    fn decodes_typed_error() {
        let raw = json!({
            "status": false,
            "error": { "code": "VALIDATION_ERROR", "message": "Invalid request data" },
            "metadata": metadata(),
        });
        let env: Envelope<String> = decode_envelope(raw, Some(is_hello_payload)).unwrap();
        assert_eq!(env.into_result().unwrap_err().code, ErrorCode::VALIDATION_ERROR);
    }

    #[test]
    fn unknown_error_code_is_malformed() {
        let raw = json!({
            "status": false,
            "error": { "code": "BOOM", "message": "?" },
            "metadata": metadata(),
        });
        assert!(matches!(
            decode_envelope::<String>(raw, None),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn decode_body_reports_invalid_json() {
        assert!(matches!(
            decode_body::<String>(b"not json", None),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn health_predicate_checks_every_field() {
        let good = json!({
            "status": "healthy",
            "uptime": 1.5,
            "timestamp": "t",
            "memory": {},
            "version": "1.0.0",
        });
        assert!(is_health_payload(&good));
        let mut bad = good.clone();
        bad["uptime"] = json!("1.5");
        assert!(!is_health_payload(&bad));
    }

    #[test]
    fn api_info_predicate_requires_string_features() {
        let mut info = json!({
            "name": "n",
            "version": "v",
            "description": "d",
            "endpoints": { "/hello": "greeting" },
            "features": ["a", "b"],
        });
        assert!(is_api_info_payload(&info));
        info["features"] = json!(["a", 1]);
        assert!(!is_api_info_payload(&info));
    }

    #[test]
    fn echo_predicate_requires_string_original_message() {
        assert!(is_echo_payload(&json!({ "originalMessage": "hi" })));
        assert!(!is_echo_payload(&json!({ "originalMessage": 1 })));
        assert!(!is_echo_payload(&json!("hi")));
    }
}
