//! The resource API core shared by every transport.
//!
//! # Responsibilities
//! - Own the prefix, path tree and middleware chain of one API
//! - Run one request through resolve → middleware → dispatch → encode
//!
//! # Design Decisions
//! - Built mutably at startup, then frozen behind `Arc` by the transport
//! - No global state: several `Api` values can live in one process
//! - Per-request data never outlives `handle`

use std::sync::Arc;

use hyper::StatusCode;

use crate::dispatch::{handle_resource, Middleware, MiddlewareChain, RequestContext};
use crate::http::{encode, EncodedResponse, InboundRequest};
use crate::observability::metrics;
use crate::resource::{Outcome, ResourceHandler};
use crate::routing::{normalize_prefix, strip_prefix, PathTree, RegistrationError};

/// Registered resources and middleware under one path prefix.
pub struct Api {
    prefix: String,
    tree: PathTree,
    middleware: MiddlewareChain,
}

impl Api {
    /// Create an empty API served under `prefix` (normalized).
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            tree: PathTree::new(),
            middleware: MiddlewareChain::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of registered resources.
    pub fn resources(&self) -> usize {
        self.tree.len()
    }

    /// Register `handler` for the resource pattern `name`, e.g.
    /// `grandparent/parent/child`. The last registration of a pattern wins.
    pub fn add_resource(
        &mut self,
        name: &str,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<(), RegistrationError> {
        self.tree.add_handler(name, handler)
    }

    /// Append a middleware. Middleware run in registration order.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    /// Process one request to completion.
    pub async fn handle(&self, req: InboundRequest) -> EncodedResponse {
        let InboundRequest {
            request_id,
            method,
            path,
            query,
            headers,
            body,
            received_at,
        } = req;

        let resolved = match strip_prefix(&self.prefix, &path).and_then(|p| self.tree.find_handler(p)) {
            Some(r) => r,
            None => {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "No resource matched");
                metrics::record_request(&method, StatusCode::NOT_FOUND, "none", received_at);
                return encode(Outcome::status(StatusCode::NOT_FOUND));
            }
        };

        let ctx = RequestContext {
            request_id,
            method,
            path,
            headers,
            resource: resolved.pattern.clone(),
            resource_id: resolved.resource_id,
            ancestor_ids: resolved.ancestor_ids,
            received_at,
        };

        let outcome = match self.middleware.run(&ctx).await {
            Err(e) => {
                metrics::record_middleware_rejection(&ctx.resource);
                Outcome::error(StatusCode::INTERNAL_SERVER_ERROR, e)
            }
            Ok(()) => {
                handle_resource(
                    &ctx.method,
                    &ctx.resource_id,
                    &ctx.ancestor_ids,
                    body,
                    &query,
                    resolved.handler.as_ref(),
                )
                .await
            }
        };

        if let Some(e) = &outcome.error {
            tracing::debug!(
                request_id = %ctx.request_id,
                status = %outcome.status,
                error = %e,
                "Request failed"
            );
        }
        metrics::record_request(&ctx.method, outcome.status, &ctx.resource, received_at);

        encode(outcome)
    }
}
