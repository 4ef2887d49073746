use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use keepsake_types::api::{
    DeleteResponse, DiarySearchQuery, DiaryUpdateResponse, NewDiaryRequest, UpdateDiaryRequest,
};
use keepsake_types::models::Diary;

use crate::AppState;
use crate::error::{ApiError, run_blocking};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Diary>>, ApiError> {
    let rows = run_blocking(move || Ok(state.db.list_diaries()?)).await?;
    Ok(Json(rows.into_iter().map(Diary::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewDiaryRequest>,
) -> Result<(StatusCode, Json<Diary>), ApiError> {
    if req.user.is_empty() || req.date.is_empty() || req.content.is_empty() || req.timestamp.is_empty()
    {
        return Err(ApiError::BadRequest("incomplete diary payload".to_string()));
    }

    let tags = req.tags.unwrap_or_default();

    let diary = run_blocking(move || {
        let id = state.db.insert_diary(&req.user, &req.date, &req.content, &req.timestamp, &tags)?;
        Ok(Diary {
            id,
            user: req.user,
            date: req.date,
            content: req.content,
            timestamp: req.timestamp,
            tags,
        })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(diary)))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<DiarySearchQuery>,
) -> Result<Json<Vec<Diary>>, ApiError> {
    let rows = run_blocking(move || {
        Ok(state.db.search_diaries(
            query.keyword.as_deref(),
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            query.user.as_deref(),
        )?)
    })
    .await?;

    Ok(Json(rows.into_iter().map(Diary::from).collect()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDiaryRequest>,
) -> Result<Json<DiaryUpdateResponse>, ApiError> {
    if req.content.is_empty() {
        return Err(ApiError::BadRequest("diary content must not be empty".to_string()));
    }

    let tags = req.tags.unwrap_or_default();
    let content = req.content;

    let response = run_blocking(move || {
        state.db.update_diary(id, &content, &tags)?;
        Ok(DiaryUpdateResponse { id, content, tags, changes: 1 })
    })
    .await?;

    Ok(Json(response))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    run_blocking(move || Ok(state.db.delete_diary(id)?)).await?;
    Ok(Json(DeleteResponse { deleted: true, changes: 1 }))
}
