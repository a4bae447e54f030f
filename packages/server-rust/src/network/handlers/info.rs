//! `GET {prefix}`: API identity and endpoint listing.

use axum::extract::State;
use lumen_core::ApiInfo;

use super::AppState;
use crate::network::RequestContext;
use crate::service::ApiReply;

pub async fn info_handler(State(state): State<AppState>, ctx: RequestContext) -> ApiReply<ApiInfo> {
    let config = state.config.clone();
    state.executor.run_sync(&ctx, || Ok(config.api_info())).await
}
