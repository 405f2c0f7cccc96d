//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML and every
//! section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::transport::TransportKind;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Resource API settings.
    pub api: ApiConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_address: String,

    /// TCP port. `0` picks an ephemeral port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ListenerConfig {
    /// `bind_address:port`, bracketing IPv6 addresses.
    pub fn socket_address(&self) -> String {
        if self.bind_address.contains(':') {
            format!("[{}]:{}", self.bind_address, self.port)
        } else {
            format!("{}:{}", self.bind_address, self.port)
        }
    }
}

/// Resource API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Path prefix every resource lives under (e.g., "/api").
    pub prefix: String,

    /// HTTP stack serving the API.
    pub transport: TransportKind,

    /// Resource patterns served by the in-memory demo store.
    pub resources: Vec<String>,

    /// Log every accepted request through the middleware chain.
    pub log_requests: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            transport: TransportKind::default(),
            resources: vec!["widgets".to_string()],
            log_requests: true,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.listener.socket_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_document() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            port = 3000

            [api]
            prefix = "/v1"
            transport = "hyper"
            resources = ["parents", "parents/children"]
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.listener.bind_address, "0.0.0.0");
        assert_eq!(config.api.transport, TransportKind::Hyper);
        assert_eq!(config.api.resources.len(), 2);
        assert!(config.api.log_requests);
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn test_ipv6_socket_address() {
        let listener = ListenerConfig {
            bind_address: "::1".into(),
            port: 80,
        };
        assert_eq!(listener.socket_address(), "[::1]:80");
    }
}
