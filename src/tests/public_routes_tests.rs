use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use tower::ServiceExt;

use super::*;
use crate::models::{MoviePayload, NewEpisode, NewMovie, NewSeries};

fn new_movie(tmdb_id: i32, title: &str) -> NewMovie {
    NewMovie {
        tmdb_id,
        title: title.to_string(),
        description: "A description".to_string(),
        poster_url: String::new(),
        release_date: "1999-10-15".to_string(),
        language: "en".to_string(),
        video_720p: "https://cdn.example/720.mp4".to_string(),
        video_1080p: "https://cdn.example/1080.mp4".to_string(),
    }
}

fn new_series(tmdb_id: i32, title: &str) -> NewSeries {
    NewSeries {
        tmdb_id,
        title: title.to_string(),
        description: String::new(),
        poster_url: String::new(),
        release_date: "2008-01-20".to_string(),
        language: "en".to_string(),
    }
}

fn episode(season_number: i32, episode_number: i32) -> NewEpisode {
    NewEpisode {
        season_number,
        episode_number,
        video_720p: format!("https://cdn.example/s{season_number}e{episode_number}.mp4"),
    }
}

#[tokio::test]
async fn test_index_describes_service() {
    let app = create_app(setup_test_state().await);
    let (status, json) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["version"], "2.0");
    assert_eq!(json["endpoints"]["public_api"], "/media");
    assert_eq!(json["database_connected"], true);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = create_app(setup_test_state().await);
    let (status, json) = send(&app, get("/does/not/exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Endpoint not found");
}

#[tokio::test]
async fn test_responses_are_indented_with_four_spaces() {
    let app = create_app(setup_test_state().await);
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("\n    \"status\": \"healthy\""));
}

#[tokio::test]
async fn test_preflight_allows_any_origin() {
    let app = create_app(setup_test_state().await);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/admin/movies")
        .header("origin", "https://frontend.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_options_without_preflight_headers_succeeds() {
    let app = create_app(setup_test_state().await);
    let request =
        Request::builder().method(Method::OPTIONS).uri("/anything").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_media_listing_combines_movies_and_series() {
    let state = setup_test_state().await;
    state.catalog.insert_movie(new_movie(550, "Fight Club")).await.unwrap();
    let series = state.catalog.insert_series(new_series(1396, "Breaking Bad")).await.unwrap();
    state.catalog.add_episode(series.id, episode(2, 1)).await.unwrap();
    state.catalog.add_episode(series.id, episode(1, 2)).await.unwrap();
    state.catalog.add_episode(series.id, episode(1, 1)).await.unwrap();

    let app = create_app(state);
    let (status, json) = send(&app, get("/media")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_count"], 2);
    assert_eq!(json["movies_count"], 1);
    assert_eq!(json["tv_series_count"], 1);

    let movie = &json["data"][0];
    assert_eq!(movie["type"], "movie");
    assert_eq!(movie["video_links"]["720p"], "https://cdn.example/720.mp4");
    assert_eq!(movie["video_links"]["1080p"], "https://cdn.example/1080.mp4");

    let tv = &json["data"][1];
    assert_eq!(tv["type"], "tv");
    assert_eq!(tv["total_seasons"], 2);
    assert_eq!(tv["seasons"]["season_1"]["total_episodes"], 2);
    assert_eq!(tv["seasons"]["season_1"]["episodes"][0]["episode_number"], 1);
    assert_eq!(tv["seasons"]["season_2"]["season_number"], 2);
}

#[tokio::test]
async fn test_media_details_prefers_movie_ids() {
    let state = setup_test_state().await;
    let movie = state.catalog.insert_movie(new_movie(550, "Fight Club")).await.unwrap();
    let first = state.catalog.insert_series(new_series(1396, "Breaking Bad")).await.unwrap();
    let second = state.catalog.insert_series(new_series(1399, "Game of Thrones")).await.unwrap();
    assert_eq!(movie.id, first.id);

    let app = create_app(state);

    let (status, json) = send(&app, get(&format!("/media/{}", movie.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["type"], "movie");
    assert_eq!(json["data"]["title"], "Fight Club");

    let (status, json) = send(&app, get(&format!("/media/{}", second.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["type"], "tv");
    assert_eq!(json["data"]["title"], "Game of Thrones");

    let (status, json) = send(&app, get("/media/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Media not found");
}

#[tokio::test]
async fn test_non_numeric_ids_are_json_404() {
    let app = create_app(setup_test_state().await);

    for uri in ["/media/abc", "/api/duplicates/movie/abc", "/api/duplicates/tv/1.5"] {
        let (status, json) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json["error"], "Endpoint not found", "{uri}");
    }
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = create_app(setup_test_state().await);

    let (status, json) = send(&app, get("/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Search query is required");

    let (status, _) = send(&app, get("/search?q=%20%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_matches_title_description_and_language() {
    let state = setup_test_state().await;
    state.catalog.insert_movie(new_movie(550, "Fight Club")).await.unwrap();
    let mut other = new_movie(680, "Pulp Fiction");
    other.language = "fr".to_string();
    other.description = "Crime stories".to_string();
    state.catalog.insert_movie(other).await.unwrap();
    state.catalog.insert_series(new_series(1396, "Breaking Bad")).await.unwrap();

    let app = create_app(state);

    let (status, json) = send(&app, get("/search?q=Club")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "Club");
    assert_eq!(json["total_results"], 1);
    assert_eq!(json["results"][0]["title"], "Fight Club");

    let (_, json) = send(&app, get("/search?q=Crime")).await;
    assert_eq!(json["movies_count"], 1);
    assert_eq!(json["results"][0]["title"], "Pulp Fiction");

    let (_, json) = send(&app, get("/search?q=en")).await;
    assert_eq!(json["movies_count"], 1);
    assert_eq!(json["tv_series_count"], 1);
}

#[tokio::test]
async fn test_duplicates_lists_every_copy() {
    let state = setup_test_state().await;
    state.catalog.insert_movie(new_movie(550, "Fight Club")).await.unwrap();
    state.catalog.insert_movie(new_movie(550, "Fight Club (4K)")).await.unwrap();

    let app = create_app(state);

    let (status, json) = send(&app, get("/api/duplicates/movie/550")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tmdb_id"], 550);
    assert_eq!(json["total_copies"], 2);
    assert!(json["movies"][0].get("type").is_none());

    let (status, json) = send(&app, get("/api/duplicates/movie/551")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No movies found with this TMDB ID");

    let (status, json) = send(&app, get("/api/duplicates/tv/1396")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No TV series found with this TMDB ID");
}

#[tokio::test]
async fn test_tv_duplicates_include_season_maps() {
    let state = setup_test_state().await;
    let first = state.catalog.insert_series(new_series(1396, "Breaking Bad")).await.unwrap();
    state.catalog.insert_series(new_series(1396, "Breaking Bad (HD)")).await.unwrap();
    state.catalog.add_episode(first.id, episode(1, 1)).await.unwrap();
    state.catalog.add_episode(first.id, episode(2, 1)).await.unwrap();

    let app = create_app(state);
    let (status, json) = send(&app, get("/api/duplicates/tv/1396")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["tmdb_id"], 1396);
    assert_eq!(json["total_copies"], 2);

    let copy = &json["tv_series"][0];
    assert!(copy.get("type").is_none());
    assert_eq!(copy["title"], "Breaking Bad");
    assert_eq!(copy["total_seasons"], 2);
    assert_eq!(copy["seasons"]["season_1"]["episodes"][0]["episode_number"], 1);
    assert_eq!(copy["seasons"]["season_2"]["total_episodes"], 1);
    assert_eq!(json["tv_series"][1]["total_seasons"], 0);
}

#[tokio::test]
async fn test_stats_count_duplicates() {
    let state = setup_test_state().await;
    state.catalog.insert_movie(new_movie(550, "Fight Club")).await.unwrap();
    state.catalog.insert_movie(new_movie(550, "Fight Club")).await.unwrap();
    state.catalog.insert_movie(new_movie(680, "Pulp Fiction")).await.unwrap();
    let series = state.catalog.insert_series(new_series(1396, "Breaking Bad")).await.unwrap();
    state.catalog.add_episode(series.id, episode(1, 1)).await.unwrap();
    state.catalog.add_episode(series.id, episode(1, 2)).await.unwrap();

    let app = create_app(state);
    let (status, json) = send(&app, get("/api/stats")).await;

    assert_eq!(status, StatusCode::OK);
    let stats = &json["statistics"];
    assert_eq!(stats["total_movies"], 3);
    assert_eq!(stats["unique_movies"], 2);
    assert_eq!(stats["duplicate_movies"], 1);
    assert_eq!(stats["total_tv_series"], 1);
    assert_eq!(stats["duplicate_tv_series"], 0);
    assert_eq!(stats["total_seasons"], 1);
    assert_eq!(stats["total_episodes"], 2);
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = create_app(setup_test_state().await);
    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["database"], "connected");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_docs_use_host_header() {
    let app = create_app(setup_test_state().await);
    let request = Request::builder()
        .uri("/api/docs")
        .header("host", "media.local:5000")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["api_documentation"]["base_url"], "http://media.local:5000/");
}

#[tokio::test]
async fn test_update_leaves_tmdb_id_untouched() {
    let state = setup_test_state().await;
    let movie = state.catalog.insert_movie(new_movie(550, "Fight Club")).await.unwrap();

    let patch: MoviePayload =
        serde_json::from_value(serde_json::json!({ "tmdb_id": 1, "language": "de" })).unwrap();
    let updated = state.catalog.update_movie(movie.id, patch).await.unwrap().unwrap();

    assert_eq!(updated.tmdb_id, 550);
    assert_eq!(updated.language.as_deref(), Some("de"));
    assert_eq!(updated.title, "Fight Club");
}
