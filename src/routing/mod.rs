//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path (/api/parents/7/children/9)
//!     → prefix.rs (strip configured prefix → /parents/7/children/9)
//!     → tree.rs (walk name/id pairs)
//!     → Return: Resolved { handler, resource_id "9", ancestor_ids ["7"] } or None
//!
//! Route registration (at startup):
//!     add_resource("parents/children", handler)
//!     → tree.rs (create intermediate nodes, bind handler)
//!     → Freeze inside Arc<Api>
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in hot path (exact segment lookups only)
//! - Deterministic: same input always resolves to the same resource
//! - Explicit None rather than a silent default handler

pub mod prefix;
pub mod tree;

pub use prefix::{normalize_prefix, strip_prefix};
pub use tree::{validate_pattern, PathTree, RegistrationError, Resolved};
