//! HTTP surface tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tokio::sync::mpsc;
use tower::ServiceExt;

use edge_router::config::{RouteEntryConfig, RuleConfig, ServerConfig};
use edge_router::routing::RouteResult;
use edge_router::{HttpServer, RouteTable, Shutdown};

mod common;

fn server() -> HttpServer {
    HttpServer::new(&ServerConfig::default(), Arc::new(common::next_app_table()))
}

async fn get(server: &HttpServer, uri: &str) -> axum::response::Response {
    server
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_backend_decision() {
    let server = server();
    let response = get(&server, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-nextjs-page"], "/index");
    assert_eq!(response.headers()["x-route-target"], "backend");
    assert_eq!(response.headers()["x-route-destination"], "/__NEXT_PAGE_LAMBDA_0");

    let result: RouteResult = body_json(response).await;
    assert!(result.found);
}

#[tokio::test]
async fn test_not_found_page_status() {
    let server = server();
    let response = get(&server, "/about").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-route-destination"], "/404");
}

#[tokio::test]
async fn test_redirect_decision() {
    let server = server();
    let response = get(&server, "/docs/intro?x=1").await;

    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://docs.example.com/intro?x=1"
    );
}

#[tokio::test]
async fn test_resolve_endpoint() {
    let server = server();
    let response = get(&server, "/_routing/resolve?path=%2Fsitemap.xml").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(response).await;
    assert_eq!(json["found"], true);
    assert_eq!(json["target"], "filesystem");
    assert_eq!(json["destination"], "/sitemap.xml");
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = server();
    let json: serde_json::Value = body_json(get(&server, "/_routing/health").await).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["rules"], 11);
}

#[tokio::test]
async fn test_table_swap_is_visible() {
    let server = server();
    assert_eq!(get(&server, "/about").await.status(), StatusCode::NOT_FOUND);

    let replacement = RouteTable::new(
        vec![RouteEntryConfig::Rule(RuleConfig {
            src: "/about".into(),
            dest: Some("/__ABOUT".into()),
            ..Default::default()
        })],
        ["/__ABOUT"],
        Vec::<String>::new(),
    )
    .unwrap();
    server.table_handle().store(Arc::new(replacement));

    let response = get(&server, "/about").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-route-destination"], "/__ABOUT");
}

#[tokio::test]
async fn test_serve_reload_and_shutdown() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server = server();
    let handle = tokio::spawn(server.run(listener, updates_rx, shutdown.clone()));

    let response = common::raw_get(addr, "/_routing/health").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains("\"rules\":11"), "{}", response);

    let empty = RouteTable::new(Vec::new(), Vec::<String>::new(), Vec::<String>::new()).unwrap();
    updates_tx.send(Arc::new(empty)).unwrap();

    let mut reloaded = false;
    for _ in 0..50 {
        if common::raw_get(addr, "/_routing/health").await.contains("\"rules\":0") {
            reloaded = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(reloaded, "table update was not applied");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop")
        .unwrap()
        .unwrap();
}
