//! End-to-end tests over real sockets for both transports.

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use resource_gateway::dispatch::{from_fn, Middleware, RequestContext};
use resource_gateway::transport::TransportKind;

mod common;

const KINDS: [TransportKind; 2] = [TransportKind::Axum, TransportKind::Hyper];

async fn send(addr: SocketAddr, method: Method, path: &str, body: &str) -> (StatusCode, String) {
    let res = common::client()
        .request(method, format!("http://{}{}", addr, path))
        .body(body.to_string())
        .send()
        .await
        .expect("Gateway unreachable");
    let status = res.status();
    (status, res.text().await.unwrap())
}

#[tokio::test]
async fn test_crud_round_trip() {
    for kind in KINDS {
        let addr = common::start_gateway(kind, "/api", &["widgets"], Vec::new()).await;

        let (status, body) = send(addr, Method::POST, "/api/widgets", r#"{"name":"bolt"}"#).await;
        assert_eq!(status, StatusCode::OK, "{kind}");
        assert_eq!(body, r#"{"id":"1"}"#);

        let (status, body) = send(addr, Method::GET, "/api/widgets/1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"name":"bolt"}"#);

        let (status, _) = send(addr, Method::PUT, "/api/widgets/1", r#"{"name":"nut"}"#).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(addr, Method::GET, "/api/widgets?limit=10", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"[{"id":"1","value":{"name":"nut"}}]"#);

        let (status, _) = send(addr, Method::DELETE, "/api/widgets/1", "").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(addr, Method::GET, "/api/widgets/1", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{kind}");
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn test_nested_resources_scoped_by_parent() {
    for kind in KINDS {
        let addr = common::start_gateway(kind, "/api", &["parents", "parents/children"], Vec::new()).await;

        let (status, _) = send(addr, Method::POST, "/api/parents/7/children", "1").await;
        assert_eq!(status, StatusCode::OK, "{kind}");

        let (_, body) = send(addr, Method::GET, "/api/parents/7/children/", "").await;
        assert_eq!(body, r#"[{"id":"1","value":1}]"#);

        let (_, body) = send(addr, Method::GET, "/api/parents/8/children", "").await;
        assert_eq!(body, "[]");

        let (status, body) = send(addr, Method::GET, "/api/parents/7/children/1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1");
    }
}

#[tokio::test]
async fn test_unmatched_paths_are_not_found() {
    for kind in KINDS {
        let addr = common::start_gateway(kind, "/api", &["widgets"], Vec::new()).await;

        for path in ["/api", "/api/", "/api/gadgets", "/widgets", "/api/widgets/1/2"] {
            let (status, body) = send(addr, Method::GET, path, "").await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{kind} {path}");
            assert!(body.is_empty(), "{kind} {path}");
        }
    }
}

#[tokio::test]
async fn test_method_rules() {
    for kind in KINDS {
        let addr = common::start_gateway(kind, "/api", &["widgets"], Vec::new()).await;

        let (status, body) = send(addr, Method::POST, "/api/widgets/5", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{kind}");
        assert_eq!(body, "POST requests must not provide an ID");

        let (status, body) = send(addr, Method::PUT, "/api/widgets", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "PUT method must provide an ID");

        let (status, body) = send(addr, Method::DELETE, "/api/widgets", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "DELETE method must provide an ID");

        let (status, body) = send(addr, Method::PATCH, "/api/widgets/5", "{}").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "Method not allowed");

        let (status, body) = send(addr, Method::OPTIONS, "/api/widgets", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OPTIONS, POST, GET, PUT, DELETE");
    }
}

#[tokio::test]
async fn test_middleware_rejection() {
    for kind in KINDS {
        let guard: Arc<dyn Middleware> = Arc::new(from_fn(|ctx: &RequestContext| {
            if ctx.headers.contains_key("x-deny") {
                Err("request denied".into())
            } else {
                Ok(())
            }
        }));
        let addr = common::start_gateway(kind, "/api", &["widgets"], vec![guard]).await;

        let res = common::client()
            .post(format!("http://{}/api/widgets", addr))
            .header("x-deny", "1")
            .body("{}")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{kind}");
        assert_eq!(res.text().await.unwrap(), "request denied");

        // The rejected POST never reached the handler.
        let (_, body) = send(addr, Method::GET, "/api/widgets", "").await;
        assert_eq!(body, "[]");
    }
}

#[tokio::test]
async fn test_body_limit() {
    for kind in KINDS {
        let addr = common::start_gateway(kind, "", &["widgets"], Vec::new()).await;
        let body = format!(r#"{{"blob":"{}"}}"#, "x".repeat(2048));

        let (status, _) = send(addr, Method::POST, "/widgets", &body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{kind}");
    }
}

#[tokio::test]
async fn test_request_id_echoed() {
    for kind in KINDS {
        let addr = common::start_gateway(kind, "/api", &["widgets"], Vec::new()).await;

        let res = common::client()
            .get(format!("http://{}/api/widgets", addr))
            .header("x-request-id", "abc-123")
            .send()
            .await
            .unwrap();
        assert_eq!(res.headers()["x-request-id"], "abc-123", "{kind}");

        let res = common::client()
            .get(format!("http://{}/api/widgets", addr))
            .send()
            .await
            .unwrap();
        assert!(res.headers().contains_key("x-request-id"), "{kind}");
    }
}
