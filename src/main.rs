//! settlement-engine - HTTP front end for the settlement engine.
//!
//! Loads the engine configuration from `SETTLEMENT_CONFIG` (default
//! `config/settlement.yaml`), falling back to built-in defaults when the
//! file is absent. The in-memory store is filled from `SETTLEMENT_SEED`
//! (default `config/seed.yaml`) and starts empty when that file is absent.
//! The API is served on `SETTLEMENT_ADDR` (default `127.0.0.1:8080`).

use std::sync::Arc;

use settlement_engine::api::{AppState, create_router};
use settlement_engine::config::{ConfigLoader, EngineConfig};
use settlement_engine::error::EngineError;
use settlement_engine::store::{MemoryStore, SeedData};
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config/settlement.yaml";
const DEFAULT_SEED_PATH: &str = "config/seed.yaml";
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

fn load_config(path: &str) -> Result<EngineConfig, EngineError> {
    match ConfigLoader::load(path) {
        Ok(loader) => {
            info!("Loaded configuration from {}", path);
            Ok(loader.into_config())
        }
        Err(EngineError::ConfigNotFound { path }) => {
            warn!("Configuration file {} not found; using built-in defaults", path);
            Ok(EngineConfig::default())
        }
        Err(e) => Err(e),
    }
}

fn load_store(path: &str) -> Result<MemoryStore, EngineError> {
    let store = MemoryStore::new();
    match SeedData::load(path) {
        Ok(seed) => {
            let loaded = seed.populate(&store);
            info!(records = loaded, "Seeded store from {}", path);
        }
        Err(EngineError::ConfigNotFound { path }) => {
            warn!("Seed file {} not found; starting with an empty store", path);
        }
        Err(e) => return Err(e),
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting settlement-engine v{}", env!("CARGO_PKG_VERSION"));

    let config_path =
        std::env::var("SETTLEMENT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let seed_path =
        std::env::var("SETTLEMENT_SEED").unwrap_or_else(|_| DEFAULT_SEED_PATH.to_string());
    let store = match load_store(&seed_path) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load seed data: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(Arc::new(store), config);
    let app = create_router(state);

    let addr = std::env::var("SETTLEMENT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("settlement-engine listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
