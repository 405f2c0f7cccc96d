//! Bare hyper transport.
//!
//! # Responsibilities
//! - Accept TCP connections and serve each on its own task
//! - Buffer the body under the size limit, then call the core
//! - Echo the request id back in `x-request-id`

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::HeaderValue;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::api::Api;
use crate::dispatch::Middleware;
use crate::http::{InboundRequest, X_REQUEST_ID};
use crate::resource::ResourceHandler;
use crate::routing::RegistrationError;
use crate::transport::{body_rejection, Transport, TransportError};

/// Pause after a failed `accept`.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Transport serving an [`Api`] on a plain hyper HTTP/1.1 server.
pub struct HyperTransport {
    api: Api,
    max_body_size: usize,
}

impl HyperTransport {
    pub fn new(prefix: &str, max_body_size: usize) -> Self {
        Self {
            api: Api::new(prefix),
            max_body_size,
        }
    }
}

#[async_trait]
impl Transport for HyperTransport {
    fn add_resource(
        &mut self,
        name: &str,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<(), RegistrationError> {
        self.api.add_resource(name, handler)
    }

    fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.api.add_middleware(middleware);
    }

    async fn run(self: Box<Self>, listener: TcpListener) -> Result<(), TransportError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.api.prefix(),
            resources = self.api.resources(),
            "hyper transport starting"
        );

        let max_body_size = self.max_body_size;
        let api = Arc::new(self.api);

        loop {
            let (stream, peer) = accept_with_backoff(|| listener.accept()).await;
            tracing::debug!(peer_addr = %peer, "Connection accepted");

            let api = Arc::clone(&api);
            tokio::spawn(async move {
                serve_connection(stream, api, max_body_size).await;
            });
        }
    }
}

/// Retry `accept` until it yields a connection, pausing after each failure
/// so a persistent error (e.g. out of file descriptors) does not spin.
async fn accept_with_backoff<T, E, F, Fut>(mut accept: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    loop {
        match accept().await {
            Ok(conn) => return conn,
            Err(e) => {
                tracing::error!(error = %e, "Accept error");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

/// Serve a single HTTP connection.
async fn serve_connection(stream: TcpStream, api: Arc<Api>, max_body_size: usize) {
    let io = TokioIo::new(stream);

    let service = service_fn(move |req| {
        let api = Arc::clone(&api);
        async move { Ok::<_, Infallible>(handle_request(req, api, max_body_size).await) }
    });

    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
        tracing::debug!(error = %e, "Connection error");
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    api: Arc<Api>,
    max_body_size: usize,
) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();

    let body = match Limited::new(body, max_body_size).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
            return body_rejection(e.as_ref()).into_http();
        }
    };

    let inbound = InboundRequest::new(
        parts.method,
        parts.uri.path(),
        parts.uri.query(),
        parts.headers,
        body,
    );
    let request_id = HeaderValue::from_str(&inbound.request_id).ok();

    let mut response = api.handle(inbound).await.into_http::<Full<Bytes>>();
    if let Some(id) = request_id {
        response.headers_mut().insert(&X_REQUEST_ID, id);
    }
    response
}
