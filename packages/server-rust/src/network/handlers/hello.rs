//! `GET /hello`.

use axum::extract::State;
use lumen_core::HELLO_MESSAGE;

use super::AppState;
use crate::network::RequestContext;
use crate::service::ApiReply;

/// Returns the fixed greeting as the payload.
pub async fn hello_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiReply<String> {
    state
        .executor
        .run_sync(&ctx, || Ok(HELLO_MESSAGE.to_string()))
        .await
}
