//! Atomic batch ingestion of client log entries.
//!
//! A batch is validated in full before anything touches storage, then
//! inserted inside a single transaction: callers see either every entry
//! persisted or none. Logs are append-only telemetry, so resubmitting an
//! identical batch appends duplicates rather than deduplicating.

use rusqlite::params;
use thiserror::Error;

use keepsake_types::api::LogEntryInput;

use crate::models::LogRow;
use crate::{Database, StoreError, StoreResult};

/// Why a log batch was not committed. `Validation` and `Empty` are detected
/// before any write; `Store` means the transaction failed and was rolled
/// back in full.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("log entry {index}: missing field `{field}`")]
    Validation { index: usize, field: &'static str },
    #[error("no log entries provided")]
    Empty,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Database {
    /// Commit `entries` as one all-or-nothing unit. Returns the number of
    /// entries saved, which on success always equals `entries.len()`.
    pub fn commit_log_batch(&self, entries: &[LogEntryInput]) -> Result<usize, BatchError> {
        if entries.is_empty() {
            return Err(BatchError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            if let Some(field) = missing_field(entry) {
                return Err(BatchError::Validation { index, field });
            }
        }

        let saved = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO logs (timestamp, level, user, message) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for entry in entries {
                    stmt.execute(params![entry.timestamp, entry.level, entry.user, entry.message])?;
                }
            }
            tx.commit()?;
            Ok(entries.len())
        })?;

        Ok(saved)
    }

    /// Most recent log entries, newest first.
    pub fn recent_logs(&self, limit: u32) -> StoreResult<Vec<LogRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, timestamp, level, user, message FROM logs
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(LogRow {
                        id: row.get(0)?,
                        timestamp: row.get(1)?,
                        level: row.get(2)?,
                        user: row.get(3)?,
                        message: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn missing_field(entry: &LogEntryInput) -> Option<&'static str> {
    if entry.timestamp.is_empty() {
        Some("timestamp")
    } else if entry.level.is_empty() {
        Some("level")
    } else if entry.user.is_empty() {
        Some("user")
    } else if entry.message.is_empty() {
        Some("message")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::BatchError;
    use crate::Database;
    use keepsake_types::api::LogEntryInput;

    fn entry(message: &str) -> LogEntryInput {
        LogEntryInput {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            level: "INFO".to_string(),
            user: "alice".to_string(),
            message: message.to_string(),
        }
    }

    fn log_count(db: &Database) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn valid_batch_saves_every_entry() {
        let db = Database::open_in_memory().unwrap();
        let batch = vec![entry("one"), entry("two"), entry("three")];

        assert_eq!(db.commit_log_batch(&batch).unwrap(), 3);
        assert_eq!(log_count(&db), 3);

        let rows = db.recent_logs(100).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn one_invalid_entry_rejects_the_whole_batch() {
        let db = Database::open_in_memory().unwrap();

        // An invalid entry at any position leaves the store untouched.
        for position in 0..3 {
            let mut batch = vec![entry("one"), entry("two"), entry("three")];
            batch[position].level = String::new();

            let err = db.commit_log_batch(&batch).unwrap_err();
            match err {
                BatchError::Validation { index, field } => {
                    assert_eq!(index, position);
                    assert_eq!(field, "level");
                }
                other => panic!("expected validation error, got {other}"),
            }
            assert_eq!(log_count(&db), 0);
        }
    }

    #[test]
    fn validation_error_names_entry_and_field() {
        let db = Database::open_in_memory().unwrap();
        let mut batch = vec![entry("one"), entry("two")];
        batch[1].user = String::new();

        let err = db.commit_log_batch(&batch).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("entry 1"), "unexpected message: {text}");
        assert!(text.contains("user"), "unexpected message: {text}");
    }

    #[test]
    fn empty_batch_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.commit_log_batch(&[]), Err(BatchError::Empty)));
    }

    #[test]
    fn storage_failure_mid_batch_rolls_back_everything() {
        let db = Database::open_in_memory().unwrap();

        // Park the AUTOINCREMENT sequence one below the rowid ceiling: the
        // first batch insert takes the last id, the second cannot be
        // assigned one and fails inside the transaction.
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO logs (id, timestamp, level, user, message)
                 VALUES (9223372036854775806, 't', 'INFO', 'alice', 'sentinel')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let batch = vec![entry("one"), entry("two")];
        let err = db.commit_log_batch(&batch).unwrap_err();
        assert!(matches!(err, BatchError::Store(_)), "unexpected error: {err}");

        // Only the sentinel remains.
        assert_eq!(log_count(&db), 1);
    }

    #[test]
    fn identical_batches_append_duplicates() {
        let db = Database::open_in_memory().unwrap();
        let batch = vec![entry("one"), entry("two")];

        db.commit_log_batch(&batch).unwrap();
        db.commit_log_batch(&batch).unwrap();
        assert_eq!(log_count(&db), 4);
    }
}
