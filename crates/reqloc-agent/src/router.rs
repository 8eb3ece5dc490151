//! Axum router wiring for the agent's local API.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{agent_state::AgentState, api};

pub fn build_router(state: AgentState) -> Router {
    Router::new()
        .route("/api/metrics", post(api::add_request))
        .route("/api/requests/:service", post(api::register_request))
        .route(
            "/api/register",
            post(api::register_instance).delete(api::deregister_instance),
        )
        .route("/healthz", get(api::healthz))
        .with_state(state)
}
