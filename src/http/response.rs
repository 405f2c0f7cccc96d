//! Response encoding.
//!
//! # Responsibilities
//! - Turn an `Outcome` (status, payload, error) into status + body bytes
//! - Synthesize a plain-text message for failures without an error
//!
//! # Design Decisions
//! - Only `200` without an error writes the handler payload, verbatim
//! - Every other outcome writes the error message as plain text and drops
//!   the payload
//! - `404` without an error has an empty body
//! - No structured error envelope: payload format belongs to the handler

use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};

use crate::resource::Outcome;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Transport-neutral response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResponse {
    pub status: StatusCode,
    pub body: Bytes,
    pub content_type: Option<&'static str>,
}

impl EncodedResponse {
    /// Build an `http::Response` around any body type constructible from bytes.
    pub fn into_http<B: From<Bytes>>(self) -> Response<B> {
        let mut response = Response::new(B::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}

/// Default message for a status when the outcome carries no error.
pub fn default_message(status: StatusCode) -> &'static str {
    if status == StatusCode::NOT_FOUND {
        return "";
    }
    status.canonical_reason().unwrap_or("Unknown status")
}

/// Encode an outcome for the wire.
pub fn encode(outcome: Outcome) -> EncodedResponse {
    let Outcome {
        status,
        payload,
        error,
    } = outcome;

    match error {
        None if status == StatusCode::OK => EncodedResponse {
            status,
            body: payload,
            content_type: None,
        },
        None => text(status, Bytes::from_static(default_message(status).as_bytes())),
        Some(e) => text(status, Bytes::from(e.to_string())),
    }
}

fn text(status: StatusCode, body: Bytes) -> EncodedResponse {
    EncodedResponse {
        status,
        body,
        content_type: Some(TEXT_PLAIN),
    }
}
