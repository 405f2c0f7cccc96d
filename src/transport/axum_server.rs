//! axum-based transport.
//!
//! # Responsibilities
//! - Create Axum Router forwarding everything under the prefix to the core
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::api::Api;
use crate::dispatch::Middleware;
use crate::http::{EncodedResponse, InboundRequest};
use crate::resource::ResourceHandler;
use crate::routing::RegistrationError;
use crate::transport::{body_rejection, Transport, TransportError};

/// State injected into the catch-all handler.
#[derive(Clone)]
struct AppState {
    api: Arc<Api>,
    max_body_size: usize,
}

/// Transport serving an [`Api`] through axum.
pub struct AxumTransport {
    api: Api,
    max_body_size: usize,
}

impl AxumTransport {
    pub fn new(prefix: &str, max_body_size: usize) -> Self {
        Self {
            api: Api::new(prefix),
            max_body_size,
        }
    }

    /// Freeze the API and build the router with all middleware layers.
    pub fn into_router(self) -> Router {
        let prefix = self.api.prefix().to_string();
        let state = AppState {
            api: Arc::new(self.api),
            max_body_size: self.max_body_size,
        };

        let (root, nested) = if prefix.is_empty() {
            ("/".to_string(), "/{*path}".to_string())
        } else {
            (prefix.clone(), format!("{}/{{*path}}", prefix))
        };

        Router::new()
            .route(&nested, any(dispatch))
            .route(&root, any(dispatch))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }
}

#[async_trait]
impl Transport for AxumTransport {
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
            "axum transport starting"
        );

        let app = self.into_router();
        axum::serve(listener, app).await?;

        tracing::info!("axum transport stopped");
        Ok(())
    }
}

/// Catch-all handler: buffer the body and hand the request to the core.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
            return body_rejection(&e).into_response();
        }
    };

    let inbound = InboundRequest::new(
        parts.method,
        parts.uri.path(),
        parts.uri.query(),
        parts.headers,
        body,
    );
    state.api.handle(inbound).await.into_response()
}

impl IntoResponse for EncodedResponse {
    fn into_response(self) -> Response {
        self.into_http::<Body>()
    }
}
