use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, repository::SignalRepository};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn SignalRepository>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(repo: Arc<dyn SignalRepository>, admin_token: Option<String>) -> Self {
        Self { repo, admin_token }
    }
}

/// Create the router with every audition, signal-bank and landing endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(handlers::health_check))
        // Audition site
        .route(
            "/api/auditions",
            get(handlers::list_auditions).post(handlers::create_audition),
        )
        .route(
            "/api/signal-bank/contributions",
            get(handlers::list_ledger).post(handlers::create_ledger_entry),
        )
        // Landing page
        .route("/api/stats", get(handlers::get_stats))
        .route(
            "/api/contribute",
            get(handlers::list_landing_contributions).post(handlers::create_landing_contribution),
        )
        .route(
            "/api/requests",
            get(handlers::list_help_requests).post(handlers::create_help_request),
        )
        .route("/api/vote", post(handlers::vote))
        .route("/api/subscribe", post(handlers::subscribe))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
