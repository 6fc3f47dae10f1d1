//! Vitalis Web Server
//!
//! Run with: cargo run -p vitalis-web

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vitalis_model::ModelState;
use vitalis_web::{config::Config, router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vitalis=debug,info")),
        )
        .init();

    info!("Starting Vitalis web server, version {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;

    // Predictor is mandatory; refuse to start without it
    let models = ModelState::load(&config.model.predictor_path, &config.model.label_decoder_path)
        .context("failed to load model artifacts")?;

    let state = AppState::new(models)?;
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
