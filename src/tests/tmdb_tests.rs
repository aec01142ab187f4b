use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use super::*;

async fn movie(Path(id): Path<i64>, Query(q): Query<HashMap<String, String>>) -> Response {
    if q.get("api_key").map(String::as_str) != Some("test-key") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id {
        550 => Json(json!({
            "id": 550,
            "title": "Fight Club",
            "overview": "An insomniac office worker...",
            "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "release_date": "1999-10-15",
            "original_language": "en",
        }))
        .into_response(),
        551 => {
            Json(json!({ "id": 551, "title": "No Poster", "poster_path": null })).into_response()
        },
        552 => (StatusCode::OK, "not json").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn tv(Path(id): Path<i64>) -> Response {
    match id {
        1396 => Json(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "overview": "A chemistry teacher...",
            "poster_path": "/ggFHVNu6YYI5L9pCfOacjizRGt.jpg",
            "first_air_date": "2008-01-20",
            "original_language": "en",
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serves canned TMDB responses on an ephemeral port.
async fn start_mock_tmdb() -> String {
    let app = Router::new().route("/movie/{id}", get(movie)).route("/tv/{id}", get(tv));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_movie_lookup_maps_fields() {
    let base = start_mock_tmdb().await;
    let app = create_app(setup_test_state_with(&base).await);

    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/movie/550", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Fight Club");
    assert_eq!(json["description"], "An insomniac office worker...");
    assert_eq!(
        json["poster_url"],
        "https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"
    );
    assert_eq!(json["release_date"], "1999-10-15");
    assert_eq!(json["language"], "en");
}

#[tokio::test]
async fn test_missing_poster_becomes_empty_string() {
    let base = start_mock_tmdb().await;
    let app = create_app(setup_test_state_with(&base).await);

    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/movie/551", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["poster_url"], "");
    assert_eq!(json["description"], "");
}

#[tokio::test]
async fn test_tv_lookup_uses_name_and_first_air_date() {
    let base = start_mock_tmdb().await;
    let app = create_app(setup_test_state_with(&base).await);

    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/tv/1396", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Breaking Bad");
    assert_eq!(json["release_date"], "2008-01-20");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let base = start_mock_tmdb().await;
    let app = create_app(setup_test_state_with(&base).await);

    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/movie/1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Movie not found");

    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/tv/1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "TV series not found");
}

#[tokio::test]
async fn test_undecodable_body_is_not_found() {
    let base = start_mock_tmdb().await;
    let app = create_app(setup_test_state_with(&base).await);

    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/movie/552", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Movie not found");
}

#[tokio::test]
async fn test_unreachable_upstream_is_not_found() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = create_app(setup_test_state_with(&format!("http://{addr}")).await);
    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/movie/550", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Movie not found");

    let (status, json) = send(&app, admin_request(Method::GET, "/api/tmdb/tv/1396", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "TV series not found");
}
