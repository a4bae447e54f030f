//! Catch-all for unmatched routes and methods.

use axum::extract::State;
use serde_json::{json, Value};

use super::AppState;
use crate::network::RequestContext;
use crate::service::{ApiError, ApiReply};

/// Answers any unmatched method/path with a 404 `NOT_FOUND` envelope
/// listing the available endpoints.
pub async fn not_found_handler(State(state): State<AppState>, ctx: RequestContext) -> ApiReply<Value> {
    let err = ApiError::not_found(format!("Endpoint {} {} not found", ctx.method, ctx.uri))
        .with_details(json!({ "availableEndpoints": state.config.available_endpoints() }));
    state.executor.reject(&ctx, &err)
}
