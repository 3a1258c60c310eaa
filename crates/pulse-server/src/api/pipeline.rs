//! Pipeline trigger and run-log endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pulse_pipeline::{run_pipeline, PipelineKind};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct TriggerRequest {
    #[serde(rename = "type")]
    pipeline: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TriggerData {
    pub success: bool,
    pub pipeline: &'static str,
    pub scraped: i32,
    pub scored: i32,
    pub errors: i32,
}

/// One run-log row, as returned by the status endpoint.
#[derive(Debug, Serialize)]
pub(super) struct PipelineRunItem {
    pub pipeline: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub results_count: i32,
    pub scored_count: i32,
    pub errors_count: i32,
    pub error_message: Option<String>,
}

impl From<pulse_db::PipelineRunRow> for PipelineRunItem {
    fn from(row: pulse_db::PipelineRunRow) -> Self {
        Self {
            pipeline: row.pipeline,
            status: row.status,
            started_at: row.started_at,
            completed_at: row.completed_at,
            results_count: row.results_count,
            scored_count: row.scored_count,
            errors_count: row.errors_count,
            error_message: row.error_message,
        }
    }
}

/// `POST /api/v1/pipeline/run` — run one pipeline synchronously.
///
/// The cron platform calls this; the request blocks until the run finishes
/// so the caller's timeout doubles as the run's wall-clock ceiling.
pub(super) async fn trigger_pipeline(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TriggerRequest>,
) -> Result<Json<ApiResponse<TriggerData>>, ApiError> {
    let kind = PipelineKind::from_str(&body.pipeline)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    match run_pipeline(Arc::clone(&state.deps), kind).await {
        Ok(Some(summary)) => Ok(Json(ApiResponse {
            data: TriggerData {
                success: true,
                pipeline: kind.as_str(),
                scraped: summary.scraped,
                scored: summary.scored,
                errors: summary.errors,
            },
            meta: ResponseMeta::new(req_id.0),
        })),
        Ok(None) => Err(ApiError::new(
            req_id.0,
            "conflict",
            format!("a {kind} run is already in progress"),
        )),
        Err(error) => {
            tracing::error!(pipeline = %kind, %error, "triggered pipeline run failed");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                format!("{kind} run failed: {error}"),
            ))
        }
    }
}

/// `GET /api/v1/pipeline/status` — the most recent run per pipeline.
pub(super) async fn pipeline_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<PipelineRunItem>>>, ApiError> {
    let runs = pulse_db::latest_runs(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: runs.into_iter().map(PipelineRunItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
