//! `GET /api/monitoring[?aggregation[&interval=<secs>]]`

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::api::ApiError;
use crate::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MonitoringQuery {
    /// Presence flag; any value (including empty) selects aggregation.
    pub aggregation: Option<String>,
    pub interval: Option<String>,
}

pub async fn list_monitoring(
    State(app): State<AppState>,
    Query(q): Query<MonitoringQuery>,
) -> Result<Response, ApiError> {
    let monitoring = app.monitoring();
    if q.aggregation.is_some() {
        let rows = monitoring.list_aggregated(q.interval.as_deref())?;
        tracing::debug!(rows = rows.len(), "replying aggregated location requests");
        Ok(Json(rows).into_response())
    } else {
        let records = monitoring.list_all();
        tracing::debug!(records = records.len(), "replying location requests");
        Ok(Json(records).into_response())
    }
}
