use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::debug;

use keepsake_types::api::{LogBatch, LogQuery, SaveLogsResponse};
use keepsake_types::models::LogEntry;

use crate::AppState;
use crate::error::{ApiError, run_blocking};

const DEFAULT_LOG_LIMIT: u32 = 100;

/// Accepts a single log object or an array; either commits in full or not
/// at all.
pub async fn save_batch(
    State(state): State<AppState>,
    Json(batch): Json<LogBatch>,
) -> Result<(StatusCode, Json<SaveLogsResponse>), ApiError> {
    let entries = batch.into_entries();

    let saved = run_blocking(move || Ok(state.db.commit_log_batch(&entries)?)).await?;
    debug!("Committed {saved} log entries");

    Ok((StatusCode::CREATED, Json(SaveLogsResponse { saved, success: true })))
}

pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    let rows = run_blocking(move || Ok(state.db.recent_logs(limit)?)).await?;
    Ok(Json(rows.into_iter().map(LogEntry::from).collect()))
}
