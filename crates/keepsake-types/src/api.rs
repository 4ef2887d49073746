use serde::{Deserialize, Serialize};

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMessageRequest {
    pub sender: String,
    /// Omitted receiver means a broadcast to everyone.
    #[serde(default)]
    pub receiver: Option<String>,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub user1: Option<String>,
    pub user2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub removed: usize,
}

// -- Diaries --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDiaryRequest {
    pub user: String,
    pub date: String,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDiaryRequest {
    pub content: String,
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiarySearchQuery {
    pub keyword: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DiaryUpdateResponse {
    pub id: i64,
    pub content: String,
    pub tags: String,
    pub changes: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub changes: usize,
}

// -- Logs --

/// One submitted log entry. All fields default to empty so that an absent
/// field and an empty one fail validation the same way, with a precise
/// per-entry error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntryInput {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub message: String,
}

/// Clients may submit either a single log object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LogBatch {
    Many(Vec<LogEntryInput>),
    One(LogEntryInput),
}

impl LogBatch {
    pub fn into_entries(self) -> Vec<LogEntryInput> {
        match self {
            Self::Many(entries) => entries,
            Self::One(entry) => vec![entry],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveLogsResponse {
    pub saved: usize,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub limit: Option<u32>,
}

// -- Anniversaries --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAnniversaryRequest {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Option<String>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub reminder_days: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct AnniversaryQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<i64>,
    pub user: Option<String>,
}
