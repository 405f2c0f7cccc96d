//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use resource_gateway::config::GatewayConfig;
use resource_gateway::dispatch::Middleware;
use resource_gateway::resource::MemoryResource;
use resource_gateway::transport::{self, TransportKind};
use tokio::net::TcpListener;

/// Start a gateway on an ephemeral port serving in-memory resources.
pub async fn start_gateway(
    kind: TransportKind,
    prefix: &str,
    resources: &[&str],
    middleware: Vec<Arc<dyn Middleware>>,
) -> SocketAddr {
    let mut config = GatewayConfig::default();
    config.api.transport = kind;
    config.api.prefix = prefix.to_string();
    config.limits.max_body_size = 1024;

    let mut server = transport::build(&config);
    for pattern in resources {
        server
            .add_resource(pattern, Arc::new(MemoryResource::new(*pattern)))
            .unwrap();
    }
    for layer in middleware {
        server.add_middleware(layer);
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// HTTP client that never reuses connections across tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
