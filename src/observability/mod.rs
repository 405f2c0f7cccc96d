//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Api::handle, middleware, transports produce:
//!     → logging.rs (structured tracing events with request_id)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every event of a request
//! - Metrics are cheap and optional (no recorder, no cost)

pub mod logging;
pub mod metrics;
