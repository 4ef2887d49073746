use serde::{Deserialize, Serialize};

/// A chat message. `receiver` may be the sentinel `"all"` for broadcasts.
/// Messages are immutable once stored; `id` is assigned by the store in
/// insertion order and is the only reliable tie-breaker when two rows carry
/// the same caller-supplied timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diary {
    pub id: i64,
    pub user: String,
    pub date: String,
    pub content: String,
    pub timestamp: String,
    pub tags: String,
}

/// One committed operational log line. Logs are append-only telemetry and
/// are never deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub level: String,
    pub user: String,
    pub message: String,
}

/// An anniversary event. `date` is the origin occurrence as `YYYY-MM-DD`;
/// for recurring events only its month and day matter, the year records when
/// the event first happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anniversary {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub description: String,
    pub photos: String,
    pub is_recurring: bool,
    pub reminder_days: i64,
    pub category: String,
    pub created_by: String,
    pub create_time: String,
}
