use anyhow::{Context, Result};
use axum::{Router, extract::FromRef};
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    catalog_api::{CatalogSource, HttpCatalogGateway},
    config::Settings,
};

// Declare modules
mod catalog_api;
mod catalog_query;
mod config;
mod error;
mod filters;
mod models;
mod pagination;
mod pricing;
mod routes;
#[cfg(test)]
mod testing;
mod views;

// Shared by every handler. The catalog sits behind a trait so tests can swap in a fake.
#[derive(Clone, FromRef)]
struct AppState {
    settings: Arc<Settings>,
    catalog: Arc<dyn CatalogSource>,
}

// One client for all upstream calls
fn build_http_client(settings: &Settings) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!("moto_catalog/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
        tracing::info!("Upstream request timeout set to {}s.", secs);
    }
    builder.build().context("Failed to build shared reqwest client")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "moto_catalog=info,tower_http=info".into()))
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing motorcycle catalog server...");

    // Load configuration
    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully. Catalog API: {}", s.api_url);
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    let shared_settings = Arc::new(settings);

    let http_client = Arc::new(build_http_client(&shared_settings)?);
    let gateway = HttpCatalogGateway::new(http_client, &shared_settings.api_url)
        .context("Failed to set up catalog API gateway")?;
    tracing::info!("Catalog gateway ready.");

    let app_state = AppState {
        settings: shared_settings.clone(),
        catalog: Arc::new(gateway),
    };

    let router: Router = routes::create_router(app_state);
    let app = router.nest_service("/static", ServeDir::new(&shared_settings.static_dir));

    let addr: SocketAddr = match shared_settings.server_address.parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(
                "Invalid server address format in configuration ('{}'): {}",
                shared_settings.server_address,
                e
            );
            return Err(anyhow::anyhow!("Invalid server address format: {}", shared_settings.server_address));
        }
    };

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
