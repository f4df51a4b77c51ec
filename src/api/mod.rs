pub mod health;
pub mod leagues;

use crate::orchestration::LeagueService;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LeagueService>,
}

impl AppState {
    pub fn new(service: Arc<LeagueService>) -> Self {
        Self { service }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/leagues", get(leagues::list_leagues))
        .route("/v1/leagues/:league", get(leagues::get_league))
        .route(
            "/v1/leagues/:league/seasons/:season",
            get(leagues::get_season),
        )
        .route(
            "/v1/leagues/:league/seasons/:season/compare",
            get(leagues::compare_matchdays),
        )
        .layer(cors)
        .with_state(state)
}
