mod auth;
mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod response;
mod routes;
mod templates;
mod tmdb;

#[cfg(test)]
mod tests;

use std::{sync::Arc, time::Duration};

use crate::{catalog::Catalog, config::Config, tmdb::TmdbClient};

pub const SERVICE_VERSION: &str = "2.0";

pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
    pub tmdb: Arc<TmdbClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,media_catalog=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent(concat!("media-catalog/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.tmdb_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    tracing::info!("database ready");

    let tmdb = TmdbClient::new(http, &config);
    let state = Arc::new(AppState {
        config: config.clone(),
        catalog: Catalog::new(db),
        tmdb: Arc::new(tmdb),
    });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
