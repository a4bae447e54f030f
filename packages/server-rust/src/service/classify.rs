//! Failure classification: converts an `ApiError` into a status code,
//! wire error code, and user-facing message.

use axum::http::StatusCode;
use lumen_core::{ErrorCode, ErrorInfo};
use serde_json::{Map, Value};

use super::error::{ApiError, DEFAULT_INTERNAL_MESSAGE};

/// Outcome of classifying a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub code: ErrorCode,
    /// Message shown to the caller.
    pub message: String,
}

/// HTTP status for an error code. Total over the closed code set.
#[must_use]
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::VALIDATION_ERROR | ErrorCode::INVALID_JSON => StatusCode::BAD_REQUEST,
        ErrorCode::NOT_FOUND => StatusCode::NOT_FOUND,
        ErrorCode::UNAUTHORIZED => StatusCode::UNAUTHORIZED,
        ErrorCode::FORBIDDEN => StatusCode::FORBIDDEN,
        ErrorCode::CONFLICT => StatusCode::CONFLICT,
        ErrorCode::INTERNAL_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Fixed user-facing message for an error code. `None` means the failure's
/// own message is shown instead.
#[must_use]
pub fn user_message_for(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::VALIDATION_ERROR => Some("Invalid request data"),
        ErrorCode::NOT_FOUND => Some("Resource not found"),
        ErrorCode::UNAUTHORIZED => Some("Unauthorized access"),
        ErrorCode::FORBIDDEN => Some("Forbidden access"),
        ErrorCode::CONFLICT => Some("Resource conflict"),
        ErrorCode::INVALID_JSON => Some("Request body contains invalid JSON"),
        ErrorCode::INTERNAL_ERROR => None,
    }
}

/// Classifies a failure.
#[must_use]
pub fn classify(err: &ApiError) -> Classification {
    let code = match err {
        ApiError::Classified { code, .. } => *code,
        ApiError::Unclassified { .. } => ErrorCode::INTERNAL_ERROR,
    };

    let message = match user_message_for(code) {
        Some(fixed) => fixed.to_string(),
        None => err
            .own_message()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_INTERNAL_MESSAGE)
            .to_string(),
    };

    Classification {
        status: status_for(code),
        code,
        message,
    }
}

/// Classifies a failure and builds the `ErrorInfo` sent on the wire.
///
/// The failure's own message is kept as `details.reason` when it is
/// non-empty and differs from the classified message. Object details are merged; any other
/// details value is kept under `details.context`.
#[must_use]
pub fn describe(err: &ApiError) -> (Classification, ErrorInfo) {
    let classification = classify(err);

    let mut details = match err.details() {
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            let mut map = Map::new();
            map.insert("context".to_string(), other.clone());
            map
        }
        None => Map::new(),
    };
    if let Some(own) = err.own_message().filter(|m| !m.is_empty()) {
        if own != classification.message {
            details.insert("reason".to_string(), Value::String(own.to_string()));
        }
    }

    let info = ErrorInfo {
        code: classification.code,
        message: classification.message.clone(),
        details: (!details.is_empty()).then_some(Value::Object(details)),
    };
    (classification, info)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn classified_table_is_exact() {
        let cases = [
            (ErrorCode::VALIDATION_ERROR, 400, "Invalid request data"),
            (ErrorCode::NOT_FOUND, 404, "Resource not found"),
            (ErrorCode::UNAUTHORIZED, 401, "Unauthorized access"),
            (ErrorCode::FORBIDDEN, 403, "Forbidden access"),
            (ErrorCode::CONFLICT, 409, "Resource conflict"),
            (ErrorCode::INVALID_JSON, 400, "Request body contains invalid JSON"),
        ];
        for (code, status, message) in cases {
            let c = classify(&ApiError::new(code, "raw detail"));
            assert_eq!(c.status.as_u16(), status, "{code}");
            assert_eq!(c.code, code);
            assert_eq!(c.message, message);
        }
    }

    #[test]
    fn internal_code_keeps_own_message() {
        let c = classify(&ApiError::new(ErrorCode::INTERNAL_ERROR, "db down"));
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(c.message, "db down");
    }

    #[test]
    fn unclassified_without_message_uses_default() {
        let c = classify(&ApiError::Unclassified { message: None });
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(c.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(c.message, "Internal Server Error");
    }

    #[test]
    fn unclassified_with_empty_message_uses_default() {
        let c = classify(&ApiError::internal(""));
        assert_eq!(c.message, "Internal Server Error");
    }

    #[test]
    fn every_code_has_a_status() {
        for code in ErrorCode::ALL {
            let status = status_for(code);
            assert!(status.is_client_error() || status.is_server_error());
        }
    }

    #[test]
    fn describe_keeps_reason_and_merges_details() {
        let err = ApiError::not_found("Endpoint GET /x not found")
            .with_details(json!({ "availableEndpoints": ["GET /api/hello"] }));
        let (c, info) = describe(&err);
        assert_eq!(c.status, StatusCode::NOT_FOUND);
        assert_eq!(info.message, "Resource not found");
        let details = info.details.unwrap();
        assert_eq!(details["reason"], "Endpoint GET /x not found");
        assert_eq!(details["availableEndpoints"][0], "GET /api/hello");
    }

    #[test]
    fn describe_wraps_non_object_details() {
        let err = ApiError::new(ErrorCode::CONFLICT, "Resource conflict").with_details(json!(7));
        let (_, info) = describe(&err);
        assert_eq!(info.details.unwrap(), json!({ "context": 7 }));
    }

    #[test]
    fn describe_omits_details_when_nothing_to_add() {
        let (_, info) = describe(&ApiError::internal("boom"));
        assert_eq!(info.message, "boom");
        assert!(info.details.is_none());
    }

    #[test]
    fn describe_skips_empty_own_message() {
        let (c, info) = describe(&ApiError::internal(""));
        assert_eq!(c.message, "Internal Server Error");
        assert!(info.details.is_none());

        let (_, info) = describe(&ApiError::validation(""));
        assert!(info.details.is_none());
    }

    proptest! {
        #[test]
        fn unclassified_status_is_always_500(msg in ".*") {
            let c = classify(&ApiError::internal(msg));
            prop_assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
            prop_assert_eq!(c.code, ErrorCode::INTERNAL_ERROR);
        }

        #[test]
        fn classified_message_ignores_raw_text(msg in ".*") {
            let c = classify(&ApiError::validation(msg));
            prop_assert_eq!(c.message, "Invalid request data");
        }
    }
}
