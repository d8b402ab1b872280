use crate::api::handlers::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod handlers;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Contract operations
        .route("/ledger/owner", get(handlers::get_owner))
        .route("/ledger/owner/transfer", post(handlers::transfer_ownership))
        .route("/ledger/deposit", post(handlers::deposit))
        .route("/ledger/withdraw", post(handlers::withdraw))
        .route("/ledger/deposits/:account", get(handlers::list_deposits))
        // Chain queries
        .route(
            "/chain/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route("/chain/simulate", post(handlers::simulate))
        .route("/chain/receipts/:account", get(handlers::get_receipts))
        // Analytics
        .route("/analytics/holdings", get(handlers::get_holdings))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
