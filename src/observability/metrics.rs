//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, resource
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_middleware_rejections_total` (counter): aborted requests by resource
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use hyper::{Method, StatusCode};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Label for a request method. Extension methods share one label so
/// clients cannot grow the label set.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}

/// Record one completed request.
pub fn record_request(method: &Method, status: StatusCode, resource: &str, start: Instant) {
    let method = method_label(method);
    let status = status.as_u16().to_string();
    let resource = resource.to_string();

    counter!(
        "gateway_requests_total",
        "method" => method,
        "status" => status.clone(),
        "resource" => resource.clone()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method,
        "status" => status,
        "resource" => resource
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request aborted by middleware.
pub fn record_middleware_rejection(resource: &str) {
    counter!("gateway_middleware_rejections_total", "resource" => resource.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::OPTIONS), "OPTIONS");

        let custom = Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(method_label(&custom), "other");
        let other = Method::from_bytes(b"X-RANDOM-1234").unwrap();
        assert_eq!(method_label(&other), "other");
    }

    #[test]
    fn test_record_without_recorder() {
        let custom = Method::from_bytes(b"PURGE").unwrap();
        record_request(&custom, StatusCode::NOT_FOUND, "none", Instant::now());
        record_middleware_rejection("widgets");
    }
}
