use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::debug;

use keepsake_types::api::{MessageQuery, NewMessageRequest, PurgeResponse};
use keepsake_types::models::ChatMessage;

use crate::AppState;
use crate::error::{ApiError, run_blocking};

/// All messages, or the conversation between `user1` and `user2` when both
/// query parameters are given. Either way the view is deduplicated.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let rows = match (query.user1, query.user2) {
        (Some(user1), Some(user2)) => {
            run_blocking(move || Ok(state.db.list_conversation(&user1, &user2)?)).await?
        }
        _ => run_blocking(move || Ok(state.db.list_messages()?)).await?,
    };

    Ok(Json(rows.into_iter().map(ChatMessage::from).collect()))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let rows = run_blocking(move || Ok(state.db.list_messages_for_user(&username)?)).await?;
    Ok(Json(rows.into_iter().map(ChatMessage::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewMessageRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    if req.sender.is_empty() || req.content.is_empty() || req.timestamp.is_empty() {
        return Err(ApiError::BadRequest("incomplete message payload".to_string()));
    }

    let receiver = req.receiver.filter(|r| !r.is_empty()).unwrap_or_else(|| "all".to_string());

    let message = run_blocking(move || {
        let id = state.db.insert_message(&req.sender, &receiver, &req.content, &req.timestamp)?;
        debug!("Stored message {id} from {}", req.sender);
        Ok(ChatMessage {
            id,
            sender: req.sender,
            receiver,
            content: req.content,
            timestamp: req.timestamp,
        })
    })
    .await?;

    Ok(Json(message))
}

/// Destructive cleanup of duplicate message rows; the read paths already
/// hide duplicates, this reclaims the storage.
pub async fn purge_duplicates(
    State(state): State<AppState>,
) -> Result<Json<PurgeResponse>, ApiError> {
    let removed = run_blocking(move || Ok(state.db.purge_duplicate_messages()?)).await?;
    debug!("Purged {removed} duplicate messages");
    Ok(Json(PurgeResponse { removed }))
}
