//! End-to-end tests for the HTTP gateway.

use std::time::Duration;

use axum::http::StatusCode;
use httpmux::config::MuxConfig;
use serde_json::Value;

mod common;

use common::{closed_address, proxy_route, respond_route, start_echo_backend, start_gateway};

#[tokio::test]
async fn test_respond_route_renders_captures() {
    let gateway = start_gateway(vec![
        respond_route("user", &["GET"], "/user/{id}", "user {id}"),
        respond_route("files", &["GET"], "/files/{*rest}", "file {rest}"),
    ])
    .await;
    let client = reqwest::Client::new();

    let resp = client.get(gateway.url("/user/42")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-mux-route").unwrap(), "user");
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "user 42");

    let resp = client.get(gateway.url("/files/a/b/c")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "file a/b/c");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_not_found_and_method_not_allowed() {
    let gateway = start_gateway(vec![
        respond_route("get-a", &["GET"], "/a", "get"),
        respond_route("post-a", &["POST"], "/a", "post"),
        respond_route("user", &["GET"], "/user/{id}", "user {id}"),
    ])
    .await;
    let client = reqwest::Client::new();

    let resp = client.post(gateway.url("/a")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "post");

    let resp = client.put(gateway.url("/a")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get("allow").unwrap(), "GET, POST");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["allowed"], serde_json::json!(["GET", "POST"]));

    let resp = client.get(gateway.url("/user/42/edit")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not found");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_request_path_is_normalized() {
    let gateway = start_gateway(vec![respond_route("docs", &[], "/docs/{page}", "{page}")]).await;
    let client = reqwest::Client::new();

    let resp = client.get(gateway.url("//docs//intro")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "intro");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_preserved() {
    let gateway = start_gateway(vec![respond_route("root", &[], "/", "root")]).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(gateway.url("/"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-123");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_proxy_route_forwards_upstream() {
    let backend = start_echo_backend().await;
    let gateway = start_gateway(vec![proxy_route("api", "/api/{*rest}", backend)]).await;
    let client = reqwest::Client::new();

    let resp = client.get(gateway.url("/api/v1/items?page=2")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-mux-route").unwrap(), "api");
    assert_eq!(
        resp.text().await.unwrap(),
        "GET /api/v1/items?page=2 HTTP/1.1 id=true"
    );

    let resp = client.get(gateway.url("/api//v1/./items?page=2")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.text().await.unwrap(),
        "GET /api/v1/items?page=2 HTTP/1.1 id=true"
    );

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_proxy_upstream_down_returns_bad_gateway() {
    let upstream = closed_address().await;
    let gateway = start_gateway(vec![proxy_route("down", "/down", upstream)]).await;
    let client = reqwest::Client::new();

    let resp = client.get(gateway.url("/down")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_replaces_route_table() {
    let gateway = start_gateway(vec![respond_route("old", &[], "/old", "old")]).await;
    let client = reqwest::Client::new();

    let resp = client.get(gateway.url("/new")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let config = MuxConfig {
        routes: vec![respond_route("new", &[], "/new", "new")],
        ..Default::default()
    };
    gateway.config_updates.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let resp = client.get(gateway.url("/new")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "new");

    let resp = client.get(gateway.url("/old")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    gateway.shutdown.trigger();
}
