//! Request body decoding.

use bytes::Bytes;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use super::handlers::AppState;
use super::RequestContext;
use crate::service::ApiError;

/// A request body parsed as untyped JSON.
///
/// Syntax errors are rejected here with a 400 `INVALID_JSON` envelope, so
/// handlers never see them. The body is parsed regardless of
/// `Content-Type`. An empty body decodes to `Value::Null` and is left for
/// the handler's own validation.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl FromRequest<AppState> for JsonBody {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let ctx = RequestContext::from_parts(&parts);
        let req = Request::from_parts(parts, body);

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            state
                .executor
                .reject::<Value>(&ctx, &ApiError::validation(rejection.body_text()))
                .into_response()
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Null));
        }

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|err| {
            state
                .executor
                .reject::<Value>(&ctx, &ApiError::invalid_json(err.to_string()))
                .into_response()
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::service::ApiConfig;

    fn state() -> AppState {
        AppState::new(ApiConfig::default())
    }

    fn post(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/api/echo")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_json_without_content_type() {
        let JsonBody(value) = JsonBody::from_request(post(r#"{"message":"hi"}"#), &state())
            .await
            .unwrap();
        assert_eq!(value, json!({ "message": "hi" }));
    }

    #[tokio::test]
    async fn empty_body_is_null() {
        let JsonBody(value) = JsonBody::from_request(post("  \n"), &state()).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn syntax_error_is_rejected_as_invalid_json() {
        let rejection = JsonBody::from_request(post("not json"), &state())
            .await
            .unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(rejection.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], false);
        assert_eq!(body["error"]["code"], "INVALID_JSON");
        assert_eq!(body["error"]["message"], "Request body contains invalid JSON");
        assert_eq!(body["metadata"]["executionTime"], 0);
    }
}
