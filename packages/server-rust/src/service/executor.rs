//! Endpoint executor: runs a unit of work and normalizes its outcome into
//! exactly one envelope.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::FutureExt;
use lumen_core::{Envelope, Metadata};
use serde::Serialize;

use super::classify::describe;
use super::error::ApiError;
use crate::network::logging::log_failure;
use crate::network::RequestContext;

// ---------------------------------------------------------------------------
// ApiReply
// ---------------------------------------------------------------------------

/// An envelope paired with the HTTP status it is sent with.
#[derive(Debug)]
pub struct ApiReply<T> {
    pub status: StatusCode,
    pub envelope: Envelope<T>,
}

impl<T> ApiReply<T> {
    fn success(payload: T, metadata: Metadata) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::success(payload, metadata),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiReply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

// ---------------------------------------------------------------------------
// EndpointExecutor
// ---------------------------------------------------------------------------

/// Runs endpoint work and assembles envelopes stamped with the API version.
///
/// Cheap to clone; shared through `AppState`.
#[derive(Debug, Clone)]
pub struct EndpointExecutor {
    version: Arc<str>,
}

impl EndpointExecutor {
    #[must_use]
    pub fn new(version: &str) -> Self {
        Self {
            version: Arc::from(version),
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Runs an asynchronous unit of work.
    ///
    /// Failures, including panics inside `work`, are classified into an
    /// error envelope; nothing escapes. `execution_time` covers the work
    /// from invocation to envelope assembly.
    pub async fn run<T, F, Fut>(&self, ctx: &RequestContext, work: F) -> ApiReply<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let start = Instant::now();
        let mut metadata = Metadata::new(ctx.request_id.as_str(), self.version());

        let outcome = AssertUnwindSafe(async move { work().await })
            .catch_unwind()
            .await;

        metadata.execution_time = duration_millis(start.elapsed());

        match outcome {
            Ok(Ok(payload)) => ApiReply::success(payload, metadata),
            Ok(Err(err)) => failure(ctx, &err, metadata),
            Err(panic) => failure(ctx, &ApiError::from_panic(panic.as_ref()), metadata),
        }
    }

    /// Runs a synchronous unit of work. See [`EndpointExecutor::run`].
    pub async fn run_sync<T, F>(&self, ctx: &RequestContext, work: F) -> ApiReply<T>
    where
        F: FnOnce() -> Result<T, ApiError>,
    {
        self.run(ctx, move || async move { work() }).await
    }

    /// Builds an error envelope for a failure detected before any work ran,
    /// such as an undecodable request body.
    #[must_use]
    pub fn reject<T>(&self, ctx: &RequestContext, err: &ApiError) -> ApiReply<T> {
        failure(ctx, err, Metadata::new(ctx.request_id.as_str(), self.version()))
    }
}

fn failure<T>(ctx: &RequestContext, err: &ApiError, metadata: Metadata) -> ApiReply<T> {
    let (classification, info) = describe(err);
    log_failure(ctx, &classification, err);
    ApiReply {
        status: classification.status,
        envelope: Envelope::error(info, metadata),
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
pub(crate) fn duration_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use lumen_core::{ErrorCode, RequestId};

    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::for_test(RequestId::new("req_test_1"))
    }

    fn executor() -> EndpointExecutor {
        EndpointExecutor::new("1.0.0")
    }

    #[tokio::test]
    async fn success_produces_ok_envelope() {
        let reply = executor()
            .run(&ctx(), || async { Ok::<_, ApiError>("done".to_string()) })
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.envelope.is_success());
        let meta = reply.envelope.metadata();
        assert_eq!(meta.request_id, "req_test_1");
        assert_eq!(meta.version, "1.0.0");
        assert_eq!(reply.envelope.into_result().unwrap(), "done");
    }

    #[tokio::test]
    async fn classified_failure_uses_table_status() {
        let reply: ApiReply<String> = executor()
            .run(&ctx(), || async { Err(ApiError::validation("missing field")) })
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        let info = reply.envelope.into_result().unwrap_err();
        assert_eq!(info.code, ErrorCode::VALIDATION_ERROR);
        assert_eq!(info.message, "Invalid request data");
        assert_eq!(info.details.unwrap()["reason"], "missing field");
    }

    #[tokio::test]
    async fn panic_becomes_internal_error_envelope() {
        let reply: ApiReply<String> = executor()
            .run_sync(&ctx(), || {
                if ctx().path.is_empty() {
                    return Ok::<String, ApiError>(String::new());
                }
                panic!("handler exploded")
            })
            .await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        let info = reply.envelope.into_result().unwrap_err();
        assert_eq!(info.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(info.message, "handler exploded");
    }

    #[tokio::test]
    async fn panic_in_async_work_is_caught() {
        let reply: ApiReply<u32> = executor()
            .run(&ctx(), || async {
                tokio::task::yield_now().await;
                if ctx().path.is_empty() {
                    return Ok::<u32, ApiError>(0);
                }
                panic!("late failure")
            })
            .await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn execution_time_covers_the_work() {
        let reply = executor()
            .run(&ctx(), || async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, ApiError>(())
            })
            .await;
        assert!(reply.envelope.metadata().execution_time >= 20);
    }

    #[tokio::test]
    async fn run_sync_wraps_plain_closures() {
        let reply = executor().run_sync(&ctx(), || Ok::<_, ApiError>(7_u8)).await;
        assert_eq!(reply.envelope.into_result().unwrap(), 7);
    }

    #[test]
    fn reject_has_zero_execution_time() {
        let reply: ApiReply<()> = executor().reject(&ctx(), &ApiError::invalid_json("eof"));
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.envelope.metadata().execution_time, 0);
        let info = reply.envelope.into_result().unwrap_err();
        assert_eq!(info.code, ErrorCode::INVALID_JSON);
    }

    #[test]
    fn duration_millis_saturates() {
        assert_eq!(duration_millis(Duration::from_millis(42)), 42);
        assert_eq!(duration_millis(Duration::MAX), u64::MAX);
    }
}
