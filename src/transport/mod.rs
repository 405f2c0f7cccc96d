//! Transport adapters binding the API core to a network listener.
//!
//! # Data Flow
//! ```text
//! TcpListener
//!     → axum_server.rs (axum Router + tower-http layers)
//!       or hyper_server.rs (bare hyper http1 accept loop)
//!     → buffer body (size limited), parse query
//!     → Api::handle
//!     → EncodedResponse written back
//! ```
//!
//! # Design Decisions
//! - One `Transport` trait, interchangeable implementations
//! - Registration happens before `run`; `run` freezes the API behind `Arc`
//! - Both adapters produce identical responses for identical requests

pub mod axum_server;
pub mod hyper_server;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{GatewayConfig, ListenerConfig};
use crate::dispatch::Middleware;
use crate::http::{encode, EncodedResponse};
use crate::resource::{Outcome, ResourceHandler};
use crate::routing::RegistrationError;

pub use axum_server::AxumTransport;
pub use hyper_server::HyperTransport;

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// Listener or connection failure while serving.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which HTTP stack serves the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// axum router with tower-http layers.
    #[default]
    Axum,
    /// Bare hyper HTTP/1.1 server.
    Hyper,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Axum => f.write_str("axum"),
            TransportKind::Hyper => f.write_str("hyper"),
        }
    }
}

/// Network binding of an [`Api`](crate::Api).
#[async_trait]
pub trait Transport: Send {
    /// Register a resource pattern such as `parents/children`.
    fn add_resource(
        &mut self,
        name: &str,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<(), RegistrationError>;

    /// Append a middleware to the chain.
    fn add_middleware(&mut self, middleware: Arc<dyn Middleware>);

    /// Serve requests on `listener` until the listener fails.
    async fn run(self: Box<Self>, listener: TcpListener) -> Result<(), TransportError>;
}

/// Build the transport selected by `config.api.transport`.
pub fn build(config: &GatewayConfig) -> Box<dyn Transport> {
    match config.api.transport {
        TransportKind::Axum => Box::new(AxumTransport::new(
            &config.api.prefix,
            config.limits.max_body_size,
        )),
        TransportKind::Hyper => Box::new(HyperTransport::new(
            &config.api.prefix,
            config.limits.max_body_size,
        )),
    }
}

/// Bind the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, TransportError> {
    let address = config.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| TransportError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(address = %listener.local_addr()?, "Listener bound");
    Ok(listener)
}

/// Response for a request body that could not be read.
fn body_rejection(err: &(dyn std::error::Error + 'static)) -> EncodedResponse {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<http_body_util::LengthLimitError>() {
            return encode(Outcome::status(StatusCode::PAYLOAD_TOO_LARGE));
        }
        current = e.source();
    }
    encode(Outcome::error(
        StatusCode::BAD_REQUEST,
        format!("Failed to read request body: {}", err),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use http_body_util::{BodyExt, Full, Limited};
    use hyper::body::Bytes;

    #[tokio::test]
    async fn test_body_rejection_length_limit() {
        let body = Limited::new(Full::new(Bytes::from_static(b"far too long")), 4);
        let err = body.collect().await.unwrap_err();
        let response = body_rejection(err.as_ref());
        assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(&response.body[..], b"Payload Too Large");
    }

    #[test]
    fn test_body_rejection_other() {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let response = body_rejection(&err);
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(&response.body[..], b"Failed to read request body: reset");
    }

    #[test]
    fn test_build_selects_kind() {
        let mut config = GatewayConfig::default();
        config.api.transport = TransportKind::Hyper;
        let mut transport = build(&config);
        assert!(transport
            .add_resource("widgets", Arc::new(crate::resource::MemoryResource::new("widgets")))
            .is_ok());
        assert_eq!(TransportKind::Hyper.to_string(), "hyper");
    }
}
