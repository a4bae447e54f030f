//! `GET /health`: liveness report with uptime and memory figures.

use axum::extract::State;
use lumen_core::{now_iso8601, HealthReport, MemoryUsage};
use sysinfo::System;

use super::AppState;
use crate::network::RequestContext;
use crate::service::ApiReply;

/// Returns a health report. Always `"healthy"`: if this handler runs, the
/// process is serving.
pub async fn health_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiReply<HealthReport> {
    let uptime = state.start_time.elapsed().as_secs_f64();
    let version = state.config.version.clone();

    state
        .executor
        .run_sync(&ctx, move || {
            Ok(HealthReport {
                status: "healthy".to_string(),
                uptime,
                timestamp: now_iso8601(),
                memory: sample_memory(),
                version,
            })
        })
        .await
}

/// Samples process and host memory. Process figures are zero when the
/// current process cannot be inspected.
#[must_use]
pub fn sample_memory() -> MemoryUsage {
    let mut system = System::new();
    system.refresh_memory();

    let (rss, virtual_memory) = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| {
            system.refresh_process(pid);
            system
                .process(pid)
                .map(|process| (process.memory(), process.virtual_memory()))
        })
        .unwrap_or_default();

    MemoryUsage {
        rss,
        virtual_memory,
        system_total: system.total_memory(),
        system_used: system.used_memory(),
    }
}
