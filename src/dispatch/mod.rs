//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Resolved { handler, resource_id, ancestor_ids }
//!     → middleware.rs (run chain in order, first error aborts with 500)
//!     → method.rs (validate id presence, pick capability)
//!     → ResourceHandler capability
//!     → Outcome (status, payload, error)
//! ```
//!
//! # Design Decisions
//! - No retries: every failure is surfaced once
//! - Dispatcher never writes to the wire, it only produces an Outcome
//! - Invalid requests are ordinary Outcomes, never panics

pub mod method;
pub mod middleware;

pub use method::{handle_resource, DispatchError};
pub use middleware::{from_fn, FnMiddleware, Middleware, MiddlewareChain, RequestContext, RequestLogger};
