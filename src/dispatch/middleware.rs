//! Pre-dispatch middleware chain.
//!
//! # Responsibilities
//! - Hold interceptors in registration order
//! - Run them against each resolved request before dispatch
//! - Stop at the first rejection
//!
//! A rejection always ends the request with `500` and the middleware's error
//! message as the body. Middleware cannot pick another status or alter the
//! response.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use hyper::{HeaderMap, Method};

use crate::resource::{AncestorIds, BoxError, ResourceId};

/// Read-only view of a resolved request handed to each middleware.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    /// Full request path, prefix included.
    pub path: String,
    pub headers: HeaderMap,
    /// Registered pattern of the matched resource.
    pub resource: Arc<str>,
    pub resource_id: ResourceId,
    pub ancestor_ids: AncestorIds,
    pub received_at: Instant,
}

/// Cross-cutting interceptor run before dispatch.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// `Err` aborts the request.
    async fn handle(&self, ctx: &RequestContext) -> Result<(), BoxError>;
}

/// Ordered, append-only sequence of middleware.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.layers.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Run every middleware in order. The first error is returned and the
    /// remaining middleware are skipped.
    pub async fn run(&self, ctx: &RequestContext) -> Result<(), BoxError> {
        for (position, layer) in self.layers.iter().enumerate() {
            if let Err(e) = layer.handle(ctx).await {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    position,
                    error = %e,
                    "Middleware rejected request"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Middleware built from a synchronous closure, see [`from_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

/// Wrap a closure as a [`Middleware`].
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&RequestContext) -> Result<(), BoxError> + Send + Sync,
{
    FnMiddleware { f }
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&RequestContext) -> Result<(), BoxError> + Send + Sync,
{
    async fn handle(&self, ctx: &RequestContext) -> Result<(), BoxError> {
        (self.f)(ctx)
    }
}

/// Logs every request that reaches the chain. Never rejects.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(&self, ctx: &RequestContext) -> Result<(), BoxError> {
        tracing::info!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            resource = %ctx.resource,
            resource_id = %ctx.resource_id,
            ancestors = ctx.ancestor_ids.len(),
            "Request accepted"
        );
        Ok(())
    }
}
