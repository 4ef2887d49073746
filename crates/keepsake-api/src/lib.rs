pub mod anniversaries;
pub mod diaries;
pub mod error;
pub mod logs;
pub mod messages;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
};

use keepsake_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/messages", get(messages::list).post(messages::create))
        .route("/api/messages/duplicates", delete(messages::purge_duplicates))
        .route("/api/messages/{username}", get(messages::list_for_user))
        .route("/api/diaries", get(diaries::list).post(diaries::create))
        .route("/api/diaries/search", get(diaries::search))
        .route("/api/diaries/{id}", axum::routing::put(diaries::update).delete(diaries::remove))
        .route("/api/logs", get(logs::recent).post(logs::save_batch))
        .route("/api/anniversaries", get(anniversaries::list).post(anniversaries::create))
        .route("/api/anniversaries/upcoming", get(anniversaries::upcoming))
        .route(
            "/api/anniversaries/{id}",
            axum::routing::put(anniversaries::update).delete(anniversaries::remove),
        )
        .with_state(state)
}
