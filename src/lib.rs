//! Resource-oriented HTTP dispatch.
//!
//! Register CRUD resource handlers under a path prefix, optionally nested
//! (`parents/children`), and serve them through axum or a bare hyper server.
//! Every request is resolved to a handler, a leaf id and the ids of all
//! enclosing resources (nearest first), passed through the middleware chain
//! and dispatched by HTTP method.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod observability;
pub mod resource;
pub mod routing;
pub mod transport;

pub use api::Api;
pub use config::schema::GatewayConfig;
pub use dispatch::{Middleware, RequestContext};
pub use resource::{AncestorIds, Outcome, Payload, QueryParameters, ResourceHandler, ResourceId};
pub use transport::{Transport, TransportKind};
