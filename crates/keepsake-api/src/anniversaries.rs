use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Local, NaiveDate};

use keepsake_types::api::{
    AnniversaryQuery, DeleteResponse, NewAnniversaryRequest, UpcomingQuery,
};
use keepsake_types::models::Anniversary;
use keepsake_types::recurrence;

use crate::AppState;
use crate::error::{ApiError, run_blocking};

const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 7;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AnniversaryQuery>,
) -> Result<Json<Vec<Anniversary>>, ApiError> {
    let rows =
        run_blocking(move || Ok(state.db.list_anniversaries(query.user.as_deref())?)).await?;
    Ok(Json(rows.into_iter().map(Anniversary::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewAnniversaryRequest>,
) -> Result<(StatusCode, Json<Anniversary>), ApiError> {
    validate(&req)?;

    let row = run_blocking(move || Ok(state.db.insert_anniversary(&req)?)).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewAnniversaryRequest>,
) -> Result<Json<Anniversary>, ApiError> {
    validate(&req)?;

    let row = run_blocking(move || {
        state.db.update_anniversary(id, &req)?;
        Ok(state.db.get_anniversary(id)?)
    })
    .await?;

    Ok(Json(row.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    run_blocking(move || Ok(state.db.delete_anniversary(id)?)).await?;
    Ok(Json(DeleteResponse { deleted: true, changes: 1 }))
}

/// Events whose next occurrence falls within the requested window,
/// soonest first. The window defaults to one week; "today" is the server's
/// local calendar date.
pub async fn upcoming(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Vec<Anniversary>>, ApiError> {
    let window_days = query.days.unwrap_or(DEFAULT_UPCOMING_WINDOW_DAYS);
    if window_days < 0 {
        return Err(ApiError::BadRequest("days must not be negative".to_string()));
    }

    let rows = run_blocking(move || Ok(state.db.list_anniversaries(None)?)).await?;
    let events: Vec<Anniversary> = rows.into_iter().map(Anniversary::from).collect();

    let reference = Local::now().date_naive();
    let hits = recurrence::upcoming(events, reference, window_days, query.user.as_deref());

    Ok(Json(hits))
}

fn validate(req: &NewAnniversaryRequest) -> Result<(), ApiError> {
    if req.title.is_empty() || req.date.is_empty() || req.created_by.is_empty() {
        return Err(ApiError::BadRequest("incomplete anniversary payload".to_string()));
    }
    if NaiveDate::parse_from_str(&req.date, "%Y-%m-%d").is_err() {
        return Err(ApiError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", req.date)));
    }
    Ok(())
}
