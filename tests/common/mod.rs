//! Shared helpers: build the router over a store and drive it with `oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use biztime::{app, AppState, MemoryStore, Store};
use serde_json::Value;
use tower::ServiceExt;

pub const BODY_LIMIT: usize = 64 * 1024;

pub fn seeded_app() -> (Router, MemoryStore) {
    let store = MemoryStore::seeded().expect("sample data loads");
    (router_for(store.clone()), store)
}

pub fn router_for<S: Store + 'static>(store: S) -> Router {
    app(AppState::new(store), BODY_LIMIT)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            let text = json.to_string();
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_LENGTH, text.len())
                .body(Body::from(text))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn send_raw(app: &Router, method: Method, uri: &str, body: &'static str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Id of the seeded invoice for `comp_code` with amount `amt`.
pub async fn invoice_id(app: &Router, comp_code: &str, amt: f64) -> i64 {
    let (_, body) = get(app, &format!("/companies/{}", comp_code)).await;
    body["company"]["invoices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|inv| inv["amt"].as_f64() == Some(amt))
        .and_then(|inv| inv["id"].as_i64())
        .unwrap()
}
