use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::config::Config;

/// Metadata fields copied into catalog entries.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TmdbDetails {
    pub title: String,
    pub description: String,
    pub poster_url: String,
    pub release_date: String,
    pub language: String,
}

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    access_token: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        if config.tmdb_api_key.trim().is_empty() && config.tmdb_access_token.trim().is_empty() {
            warn!("no TMDB_API_KEY or TMDB_ACCESS_TOKEN provided, lookups will fail");
        }

        let rps = NonZeroU32::new(config.tmdb_rps.max(1)).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self {
            client,
            api_key: config.tmdb_api_key.clone(),
            access_token: config.tmdb_access_token.clone(),
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.tmdb_image_base_url.clone(),
            limiter,
        }
    }

    /// `None` when the lookup fails for any reason.
    pub async fn movie_details(&self, tmdb_id: i64) -> Option<TmdbDetails> {
        let movie = self.fetch::<MovieResponse>(&format!("movie/{tmdb_id}")).await?;
        Some(TmdbDetails {
            title: movie.title.unwrap_or_default(),
            description: movie.overview.unwrap_or_default(),
            poster_url: self.poster_url(movie.poster_path.as_deref()),
            release_date: movie.release_date.unwrap_or_default(),
            language: movie.original_language.unwrap_or_default(),
        })
    }

    pub async fn tv_details(&self, tmdb_id: i64) -> Option<TmdbDetails> {
        let tv = self.fetch::<TvResponse>(&format!("tv/{tmdb_id}")).await?;
        Some(TmdbDetails {
            title: tv.name.unwrap_or_default(),
            description: tv.overview.unwrap_or_default(),
            poster_url: self.poster_url(tv.poster_path.as_deref()),
            release_date: tv.first_air_date.unwrap_or_default(),
            language: tv.original_language.unwrap_or_default(),
        })
    }

    fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path {
            Some(path) if !path.is_empty() => format!("{}{}", self.image_base_url, path),
            _ => String::new(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url, path);
        let mut req = self.client.get(url);
        if !self.access_token.trim().is_empty() {
            req = req.bearer_auth(&self.access_token);
        } else {
            req = req.query(&[("api_key", &self.api_key)]);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(err) => {
                warn!(path = %path, error = %err, "TMDB request failed");
                return None;
            },
        };
        if !resp.status().is_success() {
            debug!(path = %path, status = %resp.status(), "TMDB lookup unsuccessful");
            return None;
        }

        match resp.json().await {
            Ok(body) => Some(body),
            Err(err) => {
                warn!(path = %path, error = %err, "TMDB response could not be decoded");
                None
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    original_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    first_air_date: Option<String>,
    original_language: Option<String>,
}
