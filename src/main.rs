use std::sync::Arc;
use tokio::net::TcpListener;

mod api;
mod chain;
mod config;
mod errors;
mod models;
mod monitor;
mod store;
mod websocket;

#[cfg(test)]
mod tests;

use api::handlers::AppState;
use chain::Chain;
use config::Config;
use monitor::LedgerMonitor;
use store::ReceiptStore;
use websocket::WebSocketManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Deposit Ledger Service");

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    log::info!("Configuration loaded");
    log::info!(
        "Chain genesis: {} dev accounts funded with {} wei each",
        config.chain.dev_accounts,
        config.chain.initial_balance
    );

    // Initialize receipt store
    let store = Arc::new(ReceiptStore::new());

    // Initialize WebSocket manager
    let ws_manager = WebSocketManager::new();
    let ws_sender = ws_manager.sender();
    log::info!("WebSocket manager initialized");

    // Initialize the chain and deploy the contract
    let chain = Arc::new(Chain::genesis(&config.chain, Arc::clone(&store)));
    log::info!("Chain initialized; contract owner is {}", chain.owner().await);

    // Initialize the ledger monitor
    let monitor = Arc::new(LedgerMonitor::new(Arc::clone(&chain), ws_sender.clone()));
    monitor.start();
    log::info!("Ledger monitor started");

    // Create application state
    let app_state = Arc::new(AppState {
        chain: Arc::clone(&chain),
        store: Arc::clone(&store),
        monitor: Arc::clone(&monitor),
    });

    // Create router with WebSocket support
    let ws_routes = axum::Router::new()
        .route("/ws", axum::routing::get(websocket::ws_handler))
        .with_state(Arc::new(ws_sender));
    let app = api::create_router(app_state).merge(ws_routes);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
