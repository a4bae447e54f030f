//! Structured request/response logging.
//!
//! [`RequestLogLayer`] emits one record when a request arrives and one when
//! its response leaves, plus a slow-request warning past a threshold.
//! Failure records come from the executor via [`log_failure`]. All records
//! carry the request id and are fire-and-forget.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::extract::ConnectInfo;
use axum::http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};
use lumen_core::RequestId;
use tower::{Layer, Service};
use tracing::{info, warn, Level};

use crate::network::context::request_id_from_extensions;
use crate::network::RequestContext;
use crate::service::classify::Classification;
use crate::service::executor::duration_millis;
use crate::service::ApiError;

/// Emits a `tracing` event at a level chosen at runtime.
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        let level = $level;
        if level == Level::ERROR {
            tracing::error!($($arg)+);
        } else if level == Level::WARN {
            tracing::warn!($($arg)+);
        } else {
            tracing::info!($($arg)+);
        }
    };
}

/// Log severity for a response status: 5xx error, 4xx warn, else info.
#[must_use]
pub fn severity_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// Whether a request took strictly longer than the threshold.
#[must_use]
pub fn is_slow(elapsed: Duration, threshold: Duration) -> bool {
    elapsed > threshold
}

/// Records a classified failure for the request in `ctx`.
pub fn log_failure(ctx: &RequestContext, classification: &Classification, err: &ApiError) {
    log_at!(
        severity_for(classification.status),
        request_id = %ctx.request_id,
        method = %ctx.method,
        path = %ctx.path,
        status = classification.status.as_u16(),
        code = %classification.code,
        message = %classification.message,
        error = %err,
        "request failed"
    );
}

// ---------------------------------------------------------------------------
// RequestRecord
// ---------------------------------------------------------------------------

/// Request fields captured on the way in and reused for the response records.
#[derive(Debug, Clone)]
struct RequestRecord {
    request_id: String,
    method: Method,
    path: String,
    user_agent: Option<String>,
    client_ip: Option<String>,
    content_type: Option<String>,
    accept: Option<String>,
}

fn header_str(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

impl RequestRecord {
    fn from_request<B>(req: &Request<B>) -> Self {
        let request_id = request_id_from_extensions(req.extensions())
            .map_or_else(|| "unknown".to_string(), RequestId::into_string);

        Self {
            request_id,
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            user_agent: header_str(req.headers(), USER_AGENT),
            client_ip: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string()),
            content_type: header_str(req.headers(), CONTENT_TYPE),
            accept: header_str(req.headers(), ACCEPT),
        }
    }

    fn log_received(&self) {
        info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            user_agent = self.user_agent.as_deref().unwrap_or("none"),
            client_ip = self.client_ip.as_deref().unwrap_or("unknown"),
            content_type = self.content_type.as_deref().unwrap_or("none"),
            accept = self.accept.as_deref().unwrap_or("none"),
            "request received"
        );
    }

    fn log_response(&self, status: StatusCode, elapsed: Duration) {
        log_at!(
            severity_for(status),
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            status = status.as_u16(),
            response_time_ms = duration_millis(elapsed),
            "response sent"
        );
    }

    fn log_slow(&self, elapsed: Duration, threshold: Duration) {
        warn!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            duration_ms = duration_millis(elapsed),
            threshold_ms = duration_millis(threshold),
            "slow request"
        );
    }
}

// ---------------------------------------------------------------------------
// RequestLogLayer
// ---------------------------------------------------------------------------

/// Tower layer that logs every request and response passing through it.
///
/// Must sit inside `SetRequestIdLayer` so the request id extension is set.
#[derive(Debug, Clone)]
pub struct RequestLogLayer {
    slow_threshold: Duration,
}

impl RequestLogLayer {
    #[must_use]
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService {
            inner,
            slow_threshold: self.slow_threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// RequestLogService
// ---------------------------------------------------------------------------

/// Service wrapper produced by [`RequestLogLayer`].
#[derive(Debug, Clone)]
pub struct RequestLogService<S> {
    inner: S,
    slow_threshold: Duration,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + 'static,
    S::Future: Send + 'static,
    S::Error: 'static,
    ReqBody: 'static,
    ResBody: 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let record = RequestRecord::from_request(&req);
        record.log_received();

        let threshold = self.slow_threshold;
        let start = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            let elapsed = start.elapsed();

            if let Ok(response) = &result {
                record.log_response(response.status(), elapsed);
            }
            if is_slow(elapsed, threshold) {
                record.log_slow(elapsed, threshold);
            }
            result
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tower::{service_fn, ServiceExt};

    use super::*;

    #[test]
    fn severity_policy() {
        assert_eq!(severity_for(StatusCode::OK), Level::INFO);
        assert_eq!(severity_for(StatusCode::MOVED_PERMANENTLY), Level::INFO);
        assert_eq!(severity_for(StatusCode::BAD_REQUEST), Level::WARN);
        assert_eq!(severity_for(StatusCode::NOT_FOUND), Level::WARN);
        assert_eq!(severity_for(StatusCode::INTERNAL_SERVER_ERROR), Level::ERROR);
        assert_eq!(severity_for(StatusCode::SERVICE_UNAVAILABLE), Level::ERROR);
    }

    #[test]
    fn slow_threshold_is_strict() {
        let threshold = Duration::from_millis(1000);
        assert!(!is_slow(Duration::from_millis(1000), threshold));
        assert!(is_slow(Duration::from_millis(1001), threshold));
        assert!(!is_slow(Duration::from_millis(5), threshold));
    }

    #[tokio::test]
    async fn passes_response_through_unchanged() {
        let inner = service_fn(|_req: Request<()>| async {
            Ok::<_, Infallible>(
                Response::builder()
                    .status(StatusCode::CREATED)
                    .body("ok")
                    .unwrap(),
            )
        });
        let svc = RequestLogLayer::new(Duration::from_millis(1000)).layer(inner);

        let resp = svc.oneshot(Request::new(())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(*resp.body(), "ok");
    }

    #[tokio::test]
    async fn slow_requests_still_complete() {
        let inner = service_fn(|_req: Request<()>| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok::<_, Infallible>(Response::new(()))
        });
        let svc = RequestLogLayer::new(Duration::from_millis(1)).layer(inner);

        let resp = svc.oneshot(Request::new(())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn record_defaults_to_unknown_request_id() {
        let record = RequestRecord::from_request(&Request::new(()));
        assert_eq!(record.request_id, "unknown");
        assert!(record.client_ip.is_none());
    }

    #[test]
    fn record_and_context_agree_on_non_utf8_ids() {
        let mut req = Request::new(());
        req.extensions_mut()
            .insert(tower_http::request_id::RequestId::new(
                axum::http::HeaderValue::from_bytes(b"caf\xe9").unwrap(),
            ));

        let record = RequestRecord::from_request(&req);
        let (parts, ()) = req.into_parts();
        let ctx = RequestContext::from_parts(&parts);
        assert_eq!(record.request_id, ctx.request_id.as_str());
        assert!(record.request_id.starts_with("caf"));
    }
}
