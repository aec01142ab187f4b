use std::sync::Arc;

use axum::{extract::State, response::Html};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use super::{JsonBody, Path};
use crate::{
    AppState,
    catalog::{EpisodeOutcome, Listing},
    error::{AppError, AppResult, OrFail},
    models::{AdminMovie, AdminSeries, EpisodePayload, MoviePayload, SeriesPayload},
    response::PrettyJson,
    templates,
    tmdb::TmdbDetails,
};

pub async fn panel(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies =
        state.catalog.movies(Listing::NewestFirst).await.or_fail("Could not load admin panel")?;
    let series =
        state.catalog.series(Listing::NewestFirst).await.or_fail("Could not load admin panel")?;
    Ok(Html(templates::admin_page(&movies, &series)))
}

// ---- TMDB lookups ----

pub async fn tmdb_movie(
    State(state): State<Arc<AppState>>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<PrettyJson<TmdbDetails>> {
    state
        .tmdb
        .movie_details(tmdb_id)
        .await
        .map(PrettyJson)
        .ok_or(AppError::NotFound("Movie not found"))
}

pub async fn tmdb_tv(
    State(state): State<Arc<AppState>>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<PrettyJson<TmdbDetails>> {
    state
        .tmdb
        .tv_details(tmdb_id)
        .await
        .map(PrettyJson)
        .ok_or(AppError::NotFound("TV series not found"))
}

// ---- movies ----

#[derive(Debug, Serialize)]
pub struct AdminMovies {
    status: &'static str,
    total_count: usize,
    movies: Vec<AdminMovie>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> AppResult<PrettyJson<AdminMovies>> {
    let movies: Vec<AdminMovie> = state
        .catalog
        .movies(Listing::NewestFirst)
        .await
        .or_fail("Failed to retrieve movies")?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(PrettyJson(AdminMovies { status: "success", total_count: movies.len(), movies }))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<MoviePayload>,
) -> AppResult<PrettyJson<Value>> {
    let new = payload.into_new()?;
    let tmdb_id = new.tmdb_id;

    let movie = state.catalog.insert_movie(new).await.or_fail("Failed to add movie")?;
    let copies = state.catalog.count_movie_copies(tmdb_id).await.or_fail("Failed to add movie")?;
    info!(id = movie.id, tmdb_id, copies, "movie added");

    Ok(PrettyJson(json!({
        "message": "Movie added successfully",
        "id": movie.id,
        "duplicate_count": copies,
        "note": format!("This is copy #{copies} of this movie in the database"),
    })))
}

pub async fn edit_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<MoviePayload>,
) -> AppResult<PrettyJson<Value>> {
    state
        .catalog
        .update_movie(id, patch)
        .await
        .or_fail("Failed to update movie")?
        .ok_or(AppError::NotFound("Movie not found"))?;

    Ok(PrettyJson(json!({ "message": "Movie updated successfully" })))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<PrettyJson<Value>> {
    let tmdb_id = state
        .catalog
        .delete_movie(id)
        .await
        .or_fail("Failed to delete movie")?
        .ok_or(AppError::NotFound("Movie not found"))?;

    let remaining =
        state.catalog.count_movie_copies(tmdb_id).await.or_fail("Failed to delete movie")?;
    info!(id, tmdb_id, remaining, "movie deleted");

    Ok(PrettyJson(json!({
        "message": "Movie deleted successfully",
        "remaining_copies": remaining,
        "note": remaining_note(remaining, "movie"),
    })))
}

// ---- series ----

#[derive(Debug, Serialize)]
pub struct AdminSeriesList {
    status: &'static str,
    total_count: usize,
    tv_series: Vec<AdminSeries>,
}

pub async fn list_series(
    State(state): State<Arc<AppState>>,
) -> AppResult<PrettyJson<AdminSeriesList>> {
    let tv_series: Vec<AdminSeries> = state
        .catalog
        .series(Listing::NewestFirst)
        .await
        .or_fail("Failed to retrieve TV series")?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(PrettyJson(AdminSeriesList { status: "success", total_count: tv_series.len(), tv_series }))
}

pub async fn add_series(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<SeriesPayload>,
) -> AppResult<PrettyJson<Value>> {
    let new = payload.into_new()?;
    let tmdb_id = new.tmdb_id;

    let series = state.catalog.insert_series(new).await.or_fail("Failed to add TV series")?;
    let copies =
        state.catalog.count_series_copies(tmdb_id).await.or_fail("Failed to add TV series")?;
    info!(id = series.id, tmdb_id, copies, "tv series added");

    Ok(PrettyJson(json!({
        "message": "TV series added successfully",
        "id": series.id,
        "duplicate_count": copies,
        "note": format!("This is copy #{copies} of this TV series in the database"),
    })))
}

pub async fn edit_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<SeriesPayload>,
) -> AppResult<PrettyJson<Value>> {
    state
        .catalog
        .update_series(id, patch)
        .await
        .or_fail("Failed to update TV series")?
        .ok_or(AppError::NotFound("TV series not found"))?;

    Ok(PrettyJson(json!({ "message": "TV series updated successfully" })))
}

pub async fn delete_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<PrettyJson<Value>> {
    let tmdb_id = state
        .catalog
        .delete_series(id)
        .await
        .or_fail("Failed to delete TV series")?
        .ok_or(AppError::NotFound("TV series not found"))?;

    let remaining =
        state.catalog.count_series_copies(tmdb_id).await.or_fail("Failed to delete TV series")?;
    info!(id, tmdb_id, remaining, "tv series deleted");

    Ok(PrettyJson(json!({
        "message": "TV series deleted successfully",
        "remaining_copies": remaining,
        "note": remaining_note(remaining, "TV series"),
    })))
}

// ---- episodes ----

pub async fn add_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<EpisodePayload>,
) -> AppResult<PrettyJson<Value>> {
    let new = payload.into_new()?;

    match state.catalog.add_episode(id, new).await.or_fail("Failed to add episode")? {
        EpisodeOutcome::Added(episode) => {
            info!(series_id = id, episode_id = episode.id, "episode added");
            Ok(PrettyJson(json!({ "message": "Episode added successfully" })))
        },
        EpisodeOutcome::SeriesNotFound => Err(AppError::NotFound("TV series not found")),
        EpisodeOutcome::AlreadyExists => {
            Err(AppError::BadRequest("Episode already exists".to_string()))
        },
    }
}

pub async fn remove_episode(
    State(state): State<Arc<AppState>>,
    Path((id, season_number, episode_number)): Path<(i32, i32, i32)>,
) -> AppResult<PrettyJson<Value>> {
    let removed = state
        .catalog
        .remove_episode(id, season_number, episode_number)
        .await
        .or_fail("Failed to delete episode")?;
    if !removed {
        return Err(AppError::NotFound("Episode not found"));
    }

    info!(series_id = id, season_number, episode_number, "episode removed");
    Ok(PrettyJson(json!({ "message": "Episode deleted successfully" })))
}

fn remaining_note(remaining: u64, noun: &str) -> String {
    if remaining > 0 {
        format!("{remaining} copies of this {noun} remain in database")
    } else {
        format!("No more copies of this {noun} in database")
    }
}
