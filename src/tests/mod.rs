mod public_routes_tests;
mod tmdb_tests;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::AUTHORIZATION},
};
use base64::Engine;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    AppState,
    catalog::Catalog,
    config::{AdminCredentials, Config},
    db,
    routes,
    tmdb::TmdbClient,
};

pub fn test_config(tmdb_base_url: &str) -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        tmdb_api_key: "test-key".to_string(),
        tmdb_access_token: String::new(),
        tmdb_base_url: tmdb_base_url.to_string(),
        tmdb_image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        tmdb_rps: 50,
        tmdb_timeout_secs: 5,
        admin: AdminCredentials::default(),
    }
}

/// A single pooled connection keeps the in-memory database alive.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("Failed to open test database");
    db::migrate(&db).await.expect("Failed to migrate test database");
    db
}

pub async fn setup_test_state_with(tmdb_base_url: &str) -> Arc<AppState> {
    let config = Arc::new(test_config(tmdb_base_url));
    let tmdb = TmdbClient::new(reqwest::Client::new(), &config);
    Arc::new(AppState { config, catalog: Catalog::new(test_db().await), tmdb: Arc::new(tmdb) })
}

pub async fn setup_test_state() -> Arc<AppState> {
    setup_test_state_with("http://127.0.0.1:9").await
}

pub fn create_app(state: Arc<AppState>) -> Router {
    routes::router(state)
}

pub fn basic_auth(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn admin_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, basic_auth("venura", "venura"));
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, json)
}
