//! Request-id generation for the tagging layer.

use axum::http::{HeaderValue, Request};
use lumen_core::{RequestId, SERVER_PREFIX};
use tower_http::request_id::MakeRequestId;

/// Mints `req_<millis>_<suffix>` ids for requests that arrive without an
/// `x-request-id` header. Requests that carry one keep it verbatim; that
/// decision belongs to `SetRequestIdLayer`, which only calls this when the
/// header is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeApiRequestId;

impl MakeRequestId for MakeApiRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<tower_http::request_id::RequestId> {
        let id = RequestId::generate(SERVER_PREFIX);
        HeaderValue::from_str(id.as_str())
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn makes_server_prefixed_ids() {
        let req = Request::new(());
        let id = MakeApiRequestId.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(value.starts_with("req_"));
    }

    #[test]
    fn consecutive_ids_differ() {
        let req = Request::new(());
        let mut maker = MakeApiRequestId;
        let a = maker.make_request_id(&req).unwrap();
        let b = maker.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
