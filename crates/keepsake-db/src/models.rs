//! Database row types — these map directly to SQLite rows.
//! Distinct from the keepsake-types API models to keep the DB layer
//! independent; conversions live here so handlers can stay declarative.

use keepsake_types::models::{Anniversary, ChatMessage, Diary, LogEntry};

pub struct MessageRow {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    pub timestamp: String,
}

pub struct DiaryRow {
    pub id: i64,
    pub user: String,
    pub date: String,
    pub content: String,
    pub timestamp: String,
    pub tags: String,
}

pub struct LogRow {
    pub id: i64,
    pub timestamp: String,
    pub level: String,
    pub user: String,
    pub message: String,
}

pub struct AnniversaryRow {
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

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            id: row.id,
            sender: row.sender,
            receiver: row.receiver,
            content: row.content,
            timestamp: row.timestamp,
        }
    }
}

impl From<DiaryRow> for Diary {
    fn from(row: DiaryRow) -> Self {
        Diary {
            id: row.id,
            user: row.user,
            date: row.date,
            content: row.content,
            timestamp: row.timestamp,
            tags: row.tags,
        }
    }
}

impl From<LogRow> for LogEntry {
    fn from(row: LogRow) -> Self {
        LogEntry {
            id: row.id,
            timestamp: row.timestamp,
            level: row.level,
            user: row.user,
            message: row.message,
        }
    }
}

impl From<AnniversaryRow> for Anniversary {
    fn from(row: AnniversaryRow) -> Self {
        Anniversary {
            id: row.id,
            title: row.title,
            date: row.date,
            description: row.description,
            photos: row.photos,
            is_recurring: row.is_recurring,
            reminder_days: row.reminder_days,
            category: row.category,
            created_by: row.created_by,
            create_time: row.create_time,
        }
    }
}
