//! Backend entry point: loads settings, picks a storage adapter and serves
//! the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use slumbertrack::inbound::http::health::HealthState;
use slumbertrack::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use slumbertrack::settings::{AppSettings, BuildMode, session_settings};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("load settings: {e}")))?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(|e| io::Error::other(e.to_string()))?;

    let mut config = ServerConfig::new(session, settings.bind_addr());
    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(|e| io::Error::other(format!("apply migrations: {e}")))?;
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .map_err(|e| io::Error::other(format!("create database pool: {e}")))?;
            config = config.with_db_pool(pool);
            info!("using PostgreSQL storage");
        }
        None => warn!("no database URL configured; data is kept in memory only"),
    }

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
