//! `POST /api/monitoring`

use axum::{extract::State, http::StatusCode};
use bytes::Bytes;
use serde::Deserialize;

use reqloc_core::error::ReqlocError;
use reqloc_core::LocationCount;

use crate::api::ApiError;
use crate::app_state::AppState;

/// A push carries one record or a batch of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PushBody {
    One(LocationCount),
    Many(Vec<LocationCount>),
}

impl PushBody {
    fn into_vec(self) -> Vec<LocationCount> {
        match self {
            PushBody::One(c) => vec![c],
            PushBody::Many(v) => v,
        }
    }
}

/// Decode a push body. Malformed input is a client error, never an empty record.
pub fn decode_push(body: &[u8]) -> Result<Vec<LocationCount>, ReqlocError> {
    let push: PushBody = serde_json::from_slice(body)
        .map_err(|e| ReqlocError::BadRequest(format!("invalid location request body: {e}")))?;
    Ok(push.into_vec())
}

pub async fn add_monitoring(State(app): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    let counts = decode_push(&body).inspect_err(|e| {
        tracing::warn!(error = %e, bytes = body.len(), "rejected location request push");
    })?;

    app.monitoring().add_batch(counts).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected location request push");
    })?;
    Ok(StatusCode::OK)
}
