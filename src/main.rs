use anyhow::Result;
use axum::{extract::FromRef, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt};

use crate::{catalog::CatalogSession, gateway::CatalogGateway, store::JsonFileStore};

// Declare modules
mod catalog;
mod config;
mod error;
mod gateway;
mod models;
mod normalize;
mod routes;
mod sample;
mod store;

// Shared by every handler: the catalog source and the single local view session
#[derive(Clone, FromRef)]
struct AppState {
    gateway: Arc<CatalogGateway>,
    session: Arc<RwLock<CatalogSession>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autocatalog_rust=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing AutoCatalog Rust server...");

    // Load configuration
    let settings = match config::Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let http_client = Arc::new(gateway::build_http_client(&settings)?);
    let gateway = Arc::new(CatalogGateway::new(http_client, &settings));
    tracing::info!(base_url = %settings.catalog_base_url, "Catalog gateway created.");

    // Mount the view session with persisted favorites, then prime it with the catalog
    let mut session = CatalogSession::mount(Arc::new(JsonFileStore::new(&settings.favorites_path)));
    session.replace_vehicles(gateway.list_vehicles().await);
    tracing::info!("Catalog loaded with {} vehicles.", session.vehicles().len());

    let app_state = AppState {
        gateway,
        session: Arc::new(RwLock::new(session)),
    };
    let app: Router = routes::create_router(app_state);

    // Parse the server address from settings
    let addr: SocketAddr = match settings.server_address.parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(
                "Invalid server address format in configuration ('{}'): {}",
                settings.server_address,
                e
            );
            return Err(anyhow::anyhow!(
                "Invalid server address format: {}",
                settings.server_address
            ));
        }
    };

    // Create a TCP listener
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
