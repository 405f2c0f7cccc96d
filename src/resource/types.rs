//! Value types passed between the router, the dispatcher and handlers.

use std::collections::HashMap;
use std::fmt;

use hyper::body::Bytes;
use hyper::StatusCode;

/// Opaque error produced by handlers and middleware.
/// Only its `Display` text ever reaches the client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raw request or response body. Never interpreted by the core.
pub type Payload = Bytes;

/// Identifiers of every enclosing resource, nearest ancestor first.
pub type AncestorIds = Vec<ResourceId>;

/// Identifier of one resource instance.
///
/// The empty id means "no specific instance" (a collection-level request).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The collection-level sentinel.
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<&str> for ResourceId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Query string parameters. A name may carry several values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters(HashMap<String, Vec<String>>);

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    /// Repeated keys accumulate their values in order of appearance.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.insert(name.into_owned(), value.into_owned());
        }
        params
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result triple returned by every handler capability and by the dispatcher:
/// a status code, a payload and an optional error.
#[derive(Debug)]
pub struct Outcome {
    pub status: StatusCode,
    pub payload: Payload,
    pub error: Option<BoxError>,
}

impl Outcome {
    pub fn new(status: StatusCode, payload: impl Into<Payload>, error: Option<BoxError>) -> Self {
        Self {
            status,
            payload: payload.into(),
            error,
        }
    }

    /// `200 OK` carrying `payload`.
    pub fn ok(payload: impl Into<Payload>) -> Self {
        Self::new(StatusCode::OK, payload, None)
    }

    /// A status with no body and no error. The encoder synthesizes the message.
    pub fn status(status: StatusCode) -> Self {
        Self::new(status, Payload::new(), None)
    }

    /// A failure whose message is surfaced verbatim to the client.
    pub fn error(status: StatusCode, error: impl Into<BoxError>) -> Self {
        Self::new(status, Payload::new(), Some(error.into()))
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK && self.error.is_none()
    }
}
