mod admin;
mod public;

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{
        HeaderName, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
    },
    middleware,
    routing::{delete, get, post, put},
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{AppState, auth, error::AppError};

pub fn router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/admin", get(admin::panel))
        .route("/api/tmdb/movie/{tmdb_id}", get(admin::tmdb_movie))
        .route("/api/tmdb/tv/{tmdb_id}", get(admin::tmdb_tv))
        .route("/api/admin/movies", get(admin::list_movies).post(admin::add_movie))
        .route("/api/admin/movies/{id}", put(admin::edit_movie).delete(admin::delete_movie))
        .route("/api/admin/tv-series", get(admin::list_series).post(admin::add_series))
        .route("/api/admin/tv-series/{id}", put(admin::edit_series).delete(admin::delete_series))
        .route("/api/admin/tv-series/{id}/episodes", post(admin::add_episode))
        .route(
            "/api/admin/tv-series/{id}/seasons/{season}/episodes/{episode}",
            delete(admin::remove_episode),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .route("/", get(public::index))
        .route("/media", get(public::all_media))
        .route("/media/{id}", get(public::media_details))
        .route("/search", get(public::search))
        .route("/api/duplicates/movie/{tmdb_id}", get(public::movie_duplicates))
        .route("/api/duplicates/tv/{tmdb_id}", get(public::tv_duplicates))
        .route("/health", get(public::health))
        .route("/api/stats", get(public::stats))
        .route("/api/docs", get(public::docs))
        .merge(admin)
        .fallback(public::not_found)
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
            ACCEPT,
        ])
        .expose_headers([
            HeaderName::from_static("content-range"),
            HeaderName::from_static("x-content-range"),
        ])
}

/// Path parameters; a segment that fails to parse is an unknown route.
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(_) => Err(AppError::NotFound("Endpoint not found")),
        }
    }
}

/// JSON request body that must be a non-empty object.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let no_data = || AppError::BadRequest("No data provided".to_string());

        let bytes = Bytes::from_request(req, state).await.map_err(|_| no_data())?;
        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|_| no_data())?;
        if !value.as_object().is_some_and(|map| !map.is_empty()) {
            return Err(no_data());
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|err| AppError::BadRequest(format!("Invalid request body: {err}")))
    }
}
