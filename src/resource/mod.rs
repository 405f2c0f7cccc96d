//! Resource model shared by the router, dispatcher and handlers.
//!
//! # Data Flow
//! ```text
//! /parents/7/children/9?limit=10
//!     → routing (ResourceId "9", AncestorIds ["7"])
//!     → transport (Payload bytes, QueryParameters {limit: [10]})
//!     → ResourceHandler capability
//!     → Outcome (status, payload, error)
//! ```
//!
//! # Design Decisions
//! - Empty `ResourceId` is the only marker for collection-level requests
//! - Payloads are opaque bytes; the core never parses them
//! - One `ResourceHandler` implementation per resource kind

pub mod handler;
pub mod memory;
pub mod types;

pub use handler::ResourceHandler;
pub use memory::MemoryResource;
pub use types::{AncestorIds, BoxError, Outcome, Payload, QueryParameters, ResourceId};
