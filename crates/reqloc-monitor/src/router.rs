//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/monitoring",
            get(api::query::list_monitoring).post(api::ingest::add_monitoring),
        )
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
