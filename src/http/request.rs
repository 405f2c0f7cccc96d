//! Transport-neutral request representation.
//!
//! # Responsibilities
//! - Carry method, path, query string, headers and buffered body from a
//!   transport into the core
//! - Resolve the request id (propagated header or freshly generated UUID)
//!
//! # Design Decisions
//! - Request ID attached before routing so every log line carries it
//! - Body is buffered by the transport under a configured size limit

use std::time::Instant;

use hyper::header::HeaderName;
use hyper::{HeaderMap, Method};
use uuid::Uuid;

use crate::resource::{Payload, QueryParameters};

/// Header carrying the request correlation id.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A request as handed from a transport to [`Api::handle`](crate::Api::handle).
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub request_id: String,
    pub method: Method,
    pub path: String,
    pub query: QueryParameters,
    pub headers: HeaderMap,
    pub body: Payload,
    pub received_at: Instant,
}

impl InboundRequest {
    /// Build a request, reusing the `x-request-id` header when present.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        query: Option<&str>,
        headers: HeaderMap,
        body: Payload,
    ) -> Self {
        let request_id = request_id(&headers);
        Self {
            request_id,
            method,
            path: path.into(),
            query: query.map(QueryParameters::parse).unwrap_or_default(),
            headers,
            body,
            received_at: Instant::now(),
        }
    }
}

/// Request id from the `x-request-id` header, or a new UUID v4.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_request_id_propagated() {
        let mut headers = HeaderMap::new();
        headers.insert(&X_REQUEST_ID, HeaderValue::from_static("abc-123"));

        let req = InboundRequest::new(Method::GET, "/api/widgets", None, headers, Payload::new());
        assert_eq!(req.request_id, "abc-123");
    }

    #[test]
    fn test_request_id_generated() {
        let first = request_id(&HeaderMap::new());
        let second = request_id(&HeaderMap::new());

        assert!(Uuid::parse_str(&first).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn test_query_parsed() {
        let req = InboundRequest::new(
            Method::GET,
            "/api/widgets",
            Some("limit=5&tag=x&tag=y"),
            HeaderMap::new(),
            Payload::new(),
        );
        assert_eq!(req.query.get("limit"), Some("5"));
        assert_eq!(req.query.get_all("tag").len(), 2);
    }
}
