//! BOM Price Pricing Engine Service
//!
//! HTTP front end for distributor price and stock lookups.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use bomprice_pricing_engine::{
    create_app, AppState, DistributorRegistry, EngineSettings, KitSpaceClient, PricingEngine,
};
use bomprice_utils::{init_logging, AppConfig, PricingResult};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting BOM Price Pricing Engine");

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!(code = e.error_code(), "Failed to initialize pricing engine: {}", e);
            std::process::exit(e.exit_code());
        }
    };
    info!(
        backend = %config.provider.name,
        url = %engine.transport().url(),
        distributors = ?engine.registry().enabled_web_distributors(),
        "Pricing engine ready"
    );

    let app = create_app(AppState {
        engine: Arc::new(engine),
        config: Arc::new(config.clone()),
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Pricing Engine listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_engine(config: &AppConfig) -> PricingResult<PricingEngine<KitSpaceClient>> {
    let registry = DistributorRegistry::from_config(config)?;
    let client = KitSpaceClient::new(&config.provider)?;
    PricingEngine::new(registry, client, EngineSettings::from_config(config))
}
