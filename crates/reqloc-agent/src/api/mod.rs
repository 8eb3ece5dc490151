//! Local HTTP endpoints used by the co-located service.
//!
//! - `POST   /api/metrics`            : `{service, latitude, longitude}` -> add_request
//! - `POST   /api/requests/:service`  : register_request
//! - `POST   /api/register`           : register this instance with the registry
//! - `DELETE /api/register`           : deregister it
//! - `GET    /healthz`

pub mod error;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use reqloc_core::error::ReqlocError;
use reqloc_core::CountRecord;

use crate::accumulator::validate_service;
use crate::agent_state::AgentState;

pub use error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ReportedRequest {
    pub service: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct RegistrationReply {
    pub instance_id: String,
    /// False when the instance was already registered.
    pub registered: bool,
}

pub async fn add_request(State(agent): State<AgentState>, body: Bytes) -> Result<Json<CountRecord>, ApiError> {
    let req: ReportedRequest = serde_json::from_slice(&body)
        .map_err(|e| ReqlocError::BadRequest(format!("invalid request body: {e}")))?;
    validate_service(&req.service)?;
    let record = agent
        .accumulator()
        .add_request(&req.service, req.latitude, req.longitude);
    Ok(Json(record))
}

pub async fn register_request(
    State(agent): State<AgentState>,
    Path(service): Path<String>,
) -> Result<Json<CountRecord>, ApiError> {
    validate_service(&service)?;
    Ok(Json(agent.accumulator().register_request(&service)))
}

pub async fn register_instance(State(agent): State<AgentState>) -> Result<Json<RegistrationReply>, ApiError> {
    let registration = agent.registration();
    let registered = registration.register().await?;
    Ok(Json(RegistrationReply {
        instance_id: registration.instance().instance_id.clone(),
        registered,
    }))
}

pub async fn deregister_instance(State(agent): State<AgentState>) -> Result<StatusCode, ApiError> {
    agent.registration().deregister().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
