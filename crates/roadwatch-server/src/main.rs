mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use roadwatch_api::{AppState, AppStateInner};
use roadwatch_ingest::{BotClient, IngestionService, telegram};
use roadwatch_store::StoreClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roadwatch=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Store client, shared by both pipelines
    let store = StoreClient::new(&config.store_url, &config.store_key);

    let state: AppState<StoreClient> = Arc::new(AppStateInner::new(store.clone()));

    // Ingestion pipeline, only with a bot credential
    match &config.bot_token {
        Some(token) => {
            let bot = BotClient::new(token.clone());
            let ingestion = IngestionService::new(store, bot.clone());
            tokio::spawn(telegram::run(bot, ingestion));
        }
        None => warn!("ROADWATCH_BOT_TOKEN not set, ingestion pipeline disabled"),
    }

    // Routes
    let app = roadwatch_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Roadwatch server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
