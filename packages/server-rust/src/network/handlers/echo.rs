//! `POST /echo`: validates a message body and echoes it back.

use axum::extract::State;
use lumen_core::{now_iso8601, EchoReply, EchoRequest};
use serde_json::Value;

use super::AppState;
use crate::network::extract::JsonBody;
use crate::network::RequestContext;
use crate::service::{ApiError, ApiReply};

pub async fn echo_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(body): JsonBody,
) -> ApiReply<EchoReply> {
    let request_id = ctx.request_id.to_string();
    let method = ctx.method.to_string();

    state
        .executor
        .run_sync(&ctx, move || {
            let request = parse_echo_request(body)?;
            Ok(EchoReply {
                original_message: request.message,
                received_data: request.data,
                timestamp: now_iso8601(),
                request_id,
                method,
            })
        })
        .await
}

/// Checks the echo body shape.
///
/// A `null` data field counts as absent.
///
/// # Errors
///
/// Returns a `VALIDATION_ERROR` when the body is not an object, when
/// `message` is missing, non-string, or empty, or when `data` is present
/// but not an object.
pub fn parse_echo_request(body: Value) -> Result<EchoRequest, ApiError> {
    let Value::Object(mut fields) = body else {
        return Err(ApiError::validation("Request body must be a valid JSON object"));
    };

    let message = match fields.remove("message") {
        Some(Value::String(message)) if !message.is_empty() => message,
        _ => {
            return Err(ApiError::validation(
                "Message field is required and must be a string",
            ))
        }
    };

    let data = match fields.remove("data") {
        None | Some(Value::Null) => None,
        Some(Value::Object(data)) => Some(data),
        Some(_) => {
            return Err(ApiError::validation(
                "Data field must be an object if provided",
            ))
        }
    };

    Ok(EchoRequest { message, data })
}
