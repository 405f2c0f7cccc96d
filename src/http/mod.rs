//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Transport (axum or hyper)
//!     → request.rs (request id, query parsing, buffered body)
//!     → Api::handle (routing → middleware → dispatch)
//!     → response.rs (Outcome → status + body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;

pub use request::{InboundRequest, X_REQUEST_ID};
pub use response::{encode, EncodedResponse};
