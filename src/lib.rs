pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use anyhow::Result;
use infrastructure::postgres::postgres_connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    infrastructure::axum_http::http_serve::start(Arc::new(dotenvy_env), Arc::new(postgres_pool))
        .await?;

    Ok(())
}
