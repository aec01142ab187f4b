use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::HOST},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Path;
use crate::{
    AppState, SERVICE_VERSION,
    catalog::Listing,
    error::{AppError, AppResult, OrFail},
    models::{CatalogStats, MediaItem, MediaKind, MovieItem, SeriesItem},
    response::PrettyJson,
};

pub async fn index(State(state): State<Arc<AppState>>) -> PrettyJson<serde_json::Value> {
    let database_connected = state.catalog.ping().await.is_ok();
    PrettyJson(json!({
        "status": "success",
        "message": "Zero Creations Media Database is running",
        "version": SERVICE_VERSION,
        "endpoints": {
            "admin_panel": "/admin",
            "public_api": "/media",
            "search": "/search?q=query",
            "health": "/health",
            "stats": "/api/stats",
            "docs": "/api/docs",
        },
        "cors_enabled": true,
        "database_connected": database_connected,
    }))
}

#[derive(Debug, Serialize)]
pub struct MediaListing {
    status: &'static str,
    total_count: usize,
    movies_count: usize,
    tv_series_count: usize,
    data: Vec<MediaItem>,
}

pub async fn all_media(
    State(state): State<Arc<AppState>>,
) -> AppResult<PrettyJson<MediaListing>> {
    let result: AppResult<Vec<MediaItem>> = async {
        let movies = state.catalog.movies(Listing::ById).await?;
        let series = state.catalog.series(Listing::ById).await?;
        Ok(merge_media(movies.into_iter().map(Into::into), series.into_iter().map(Into::into)))
    }
    .await;
    let result = result.or_fail("Failed to retrieve media")?;

    let (movies_count, tv_series_count) = count_kinds(&result);
    Ok(PrettyJson(MediaListing {
        status: "success",
        total_count: result.len(),
        movies_count,
        tv_series_count,
        data: result,
    }))
}

#[derive(Debug, Serialize)]
pub struct MediaDetails {
    status: &'static str,
    data: MediaItem,
}

/// Movie ids are checked before series ids.
pub async fn media_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<PrettyJson<MediaDetails>> {
    let found: AppResult<Option<MediaItem>> = async {
        if let Some(movie) = state.catalog.movie(id).await? {
            return Ok(Some(MediaItem::Movie(movie.into())));
        }
        Ok(state.catalog.series_tree(id).await?.map(|tree| MediaItem::Series(tree.into())))
    }
    .await;

    let data = found
        .or_fail("Failed to retrieve media details")?
        .ok_or(AppError::NotFound("Media not found"))?;
    Ok(PrettyJson(MediaDetails { status: "success", data }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    status: &'static str,
    query: String,
    total_results: usize,
    movies_count: usize,
    tv_series_count: usize,
    results: Vec<MediaItem>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<PrettyJson<SearchResults>> {
    let query = params.q.unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_string()));
    }

    let (movies, series) = state.catalog.search(&query).await.or_fail("Failed to search media")?;
    let results =
        merge_media(movies.into_iter().map(Into::into), series.into_iter().map(Into::into));
    let (movies_count, tv_series_count) = count_kinds(&results);

    Ok(PrettyJson(SearchResults {
        status: "success",
        query,
        total_results: results.len(),
        movies_count,
        tv_series_count,
        results,
    }))
}

#[derive(Debug, Serialize)]
pub struct MovieCopies {
    status: &'static str,
    tmdb_id: i32,
    total_copies: usize,
    movies: Vec<MovieItem>,
}

pub async fn movie_duplicates(
    State(state): State<Arc<AppState>>,
    Path(tmdb_id): Path<i32>,
) -> AppResult<PrettyJson<MovieCopies>> {
    let movies =
        state.catalog.movies_by_tmdb(tmdb_id).await.or_fail("Failed to get movie duplicates")?;
    if movies.is_empty() {
        return Err(AppError::NotFound("No movies found with this TMDB ID"));
    }

    let movies: Vec<MovieItem> =
        movies.into_iter().map(|m| MovieItem::from(m).untyped()).collect();
    Ok(PrettyJson(MovieCopies { status: "success", tmdb_id, total_copies: movies.len(), movies }))
}

#[derive(Debug, Serialize)]
pub struct SeriesCopies {
    status: &'static str,
    tmdb_id: i32,
    total_copies: usize,
    tv_series: Vec<SeriesItem>,
}

pub async fn tv_duplicates(
    State(state): State<Arc<AppState>>,
    Path(tmdb_id): Path<i32>,
) -> AppResult<PrettyJson<SeriesCopies>> {
    let series =
        state.catalog.series_by_tmdb(tmdb_id).await.or_fail("Failed to get TV duplicates")?;
    if series.is_empty() {
        return Err(AppError::NotFound("No TV series found with this TMDB ID"));
    }

    let tv_series: Vec<SeriesItem> =
        series.into_iter().map(|t| SeriesItem::from(t).untyped()).collect();
    Ok(PrettyJson(SeriesCopies {
        status: "success",
        tmdb_id,
        total_copies: tv_series.len(),
        tv_series,
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> PrettyJson<serde_json::Value> {
    let database = match state.catalog.ping().await {
        Ok(()) => "connected".to_string(),
        Err(err) => format!("error: {err}"),
    };

    PrettyJson(json!({
        "status": "healthy",
        "database": database,
        "timestamp": jiff::Timestamp::now().to_string(),
        "version": SERVICE_VERSION,
    }))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    status: &'static str,
    statistics: CatalogStats,
    timestamp: String,
}

pub async fn stats(State(state): State<Arc<AppState>>) -> AppResult<PrettyJson<StatsResponse>> {
    let statistics = state.catalog.stats().await.or_fail("Failed to get statistics")?;
    Ok(PrettyJson(StatsResponse {
        status: "success",
        statistics,
        timestamp: jiff::Timestamp::now().to_string(),
    }))
}

pub async fn docs(headers: HeaderMap) -> PrettyJson<serde_json::Value> {
    let host = headers.get(HOST).and_then(|h| h.to_str().ok()).unwrap_or("localhost");
    PrettyJson(json!({
        "api_documentation": {
            "version": SERVICE_VERSION,
            "base_url": format!("http://{host}/"),
            "authentication": {
                "admin_routes": "Basic Auth",
                "public_routes": "No authentication required",
            },
            "endpoints": {
                "public_api": {
                    "GET /media": "Get all movies and TV series",
                    "GET /media/<id>": "Get specific media details",
                    "GET /search?q=<query>": "Search media by title, description, or language",
                    "GET /health": "Health check",
                    "GET /api/stats": "Database statistics",
                    "GET /api/docs": "This documentation",
                },
                "admin_api": {
                    "GET /admin": "Admin panel (requires auth)",
                    "GET /api/admin/movies": "Get all movies for admin",
                    "POST /api/admin/movies": "Add new movie",
                    "PUT /api/admin/movies/<id>": "Update movie",
                    "DELETE /api/admin/movies/<id>": "Delete movie",
                    "GET /api/admin/tv-series": "Get all TV series for admin",
                    "POST /api/admin/tv-series": "Add new TV series",
                    "PUT /api/admin/tv-series/<id>": "Update TV series",
                    "DELETE /api/admin/tv-series/<id>": "Delete TV series",
                    "POST /api/admin/tv-series/<id>/episodes": "Add episode to TV series",
                    "DELETE /api/admin/tv-series/<id>/seasons/<season>/episodes/<episode>":
                        "Remove an episode",
                },
                "tmdb_integration": {
                    "GET /api/tmdb/movie/<tmdb_id>": "Fetch movie details from TMDB",
                    "GET /api/tmdb/tv/<tmdb_id>": "Fetch TV series details from TMDB",
                },
                "duplicate_management": {
                    "GET /api/duplicates/movie/<tmdb_id>": "Get all copies of a movie by TMDB ID",
                    "GET /api/duplicates/tv/<tmdb_id>": "Get all copies of a TV series by TMDB ID",
                },
            },
            "features": [
                "CORS enabled for all origins",
                "Duplicate media entries allowed",
                "TMDB integration for metadata",
                "Full CRUD operations for admin",
                "Search functionality",
                "Episode management for TV series",
            ],
        }
    }))
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, PrettyJson(json!({ "error": "Endpoint not found" }))).into_response()
}

fn merge_media(
    movies: impl Iterator<Item = MovieItem>,
    series: impl Iterator<Item = SeriesItem>,
) -> Vec<MediaItem> {
    movies.map(MediaItem::Movie).chain(series.map(MediaItem::Series)).collect()
}

fn count_kinds(items: &[MediaItem]) -> (usize, usize) {
    let movies = items.iter().filter(|i| i.kind() == MediaKind::Movie).count();
    (movies, items.len() - movies)
}
