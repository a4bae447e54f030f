//! Per-request context threaded explicitly through handlers, the executor,
//! and failure logging.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::{Extensions, Method};
use lumen_core::{RequestId, SERVER_PREFIX};

/// Identity of the request currently being handled.
///
/// Built from request parts by the axum extractor. The `request_id` is the
/// one assigned (or reused) by the tagging layer; if that layer is absent a
/// fresh id is minted so the context is always complete.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub method: Method,
    /// Path without query string.
    pub path: String,
    /// Path and query as received.
    pub uri: String,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Builds the context from request parts without consuming them.
    #[must_use]
    pub fn from_parts(parts: &Parts) -> Self {
        let request_id = request_id_from_extensions(&parts.extensions)
            .unwrap_or_else(|| RequestId::generate(SERVER_PREFIX));

        let uri = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);

        Self {
            request_id,
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            uri,
            user_agent: parts
                .headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_test(request_id: RequestId) -> Self {
        Self {
            request_id,
            method: Method::GET,
            path: "/test".to_string(),
            uri: "/test".to_string(),
            user_agent: None,
        }
    }
}

/// Reads the id set by the tagging layer. Non-UTF-8 bytes are replaced
/// lossily, so every reader of the same request sees the same id.
pub(crate) fn request_id_from_extensions(extensions: &Extensions) -> Option<RequestId> {
    extensions
        .get::<tower_http::request_id::RequestId>()
        .map(|id| RequestId::new(String::from_utf8_lossy(id.header_value().as_bytes())))
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
