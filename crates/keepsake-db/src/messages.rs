//! Message storage and the deduplicated read paths.
//!
//! Retried client sends can leave identical rows (same sender, receiver,
//! content, timestamp) in `chat_messages`. Every read goes through a
//! window-function view that keeps only the lowest-id row per duplicate
//! group, so readers never see duplicates and storage is never mutated on
//! read. `purge_duplicate_messages` is the explicit destructive counterpart.

use rusqlite::{Connection, params};

use crate::models::MessageRow;
use crate::{Database, StoreResult};

/// Duplicate-free view over `chat_messages`: within each
/// (sender, receiver, content, timestamp) group only the row with the
/// smallest id survives.
const DEDUPED_MESSAGES: &str = "
    SELECT id, sender, receiver, content, timestamp FROM (
        SELECT *, ROW_NUMBER() OVER (
            PARTITION BY sender, receiver, content, timestamp
            ORDER BY id ASC
        ) AS rn
        FROM chat_messages
    ) WHERE rn = 1";

impl Database {
    pub fn insert_message(
        &self,
        sender: &str,
        receiver: &str,
        content: &str,
        timestamp: &str,
    ) -> StoreResult<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (sender, receiver, content, timestamp) VALUES (?1, ?2, ?3, ?4)",
                params![sender, receiver, content, timestamp],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All messages, deduplicated, newest first. Equal timestamps order by
    /// id ascending so repeated reads are stable.
    pub fn list_messages(&self) -> StoreResult<Vec<MessageRow>> {
        let sql = format!("{DEDUPED_MESSAGES} ORDER BY timestamp DESC, id ASC");
        self.with_conn(|conn| query_messages(conn, &sql, params![]))
    }

    /// The conversation between two parties, in either direction,
    /// deduplicated, oldest first.
    pub fn list_conversation(&self, user1: &str, user2: &str) -> StoreResult<Vec<MessageRow>> {
        let sql = "
            SELECT id, sender, receiver, content, timestamp FROM (
                SELECT *, ROW_NUMBER() OVER (
                    PARTITION BY sender, receiver, content, timestamp
                    ORDER BY id ASC
                ) AS rn
                FROM chat_messages
                WHERE (sender = ?1 AND receiver = ?2) OR (sender = ?2 AND receiver = ?1)
            ) WHERE rn = 1
            ORDER BY timestamp ASC, id ASC";
        self.with_conn(|conn| query_messages(conn, sql, params![user1, user2]))
    }

    /// Messages a user sent, received, or was broadcast ('all'), deduplicated,
    /// newest first.
    pub fn list_messages_for_user(&self, username: &str) -> StoreResult<Vec<MessageRow>> {
        let sql = format!(
            "{DEDUPED_MESSAGES} AND (sender = ?1 OR receiver = ?1 OR receiver = 'all')
             ORDER BY timestamp DESC, id ASC"
        );
        self.with_conn(|conn| query_messages(conn, &sql, params![username]))
    }

    /// Physically delete every message that is not the lowest-id row of its
    /// duplicate group. Runs as one transaction and returns the number of
    /// rows removed; a second run right after removes nothing.
    pub fn purge_duplicate_messages(&self) -> StoreResult<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute(
                "DELETE FROM chat_messages
                 WHERE id NOT IN (
                     SELECT MIN(id)
                     FROM chat_messages
                     GROUP BY sender, receiver, content, timestamp
                 )",
                [],
            )?;
            tx.commit()?;
            Ok(removed)
        })
    }
}

fn query_messages(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> StoreResult<Vec<MessageRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                sender: row.get(1)?,
                receiver: row.get(2)?,
                content: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn raw_count(db: &Database) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM chat_messages", [], |row| row.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn retried_sends_collapse_to_the_first_insert() {
        let db = db();
        for _ in 0..3 {
            db.insert_message("alice", "bob", "hi", "2024-01-01T00:00:00Z").unwrap();
        }

        let rows = db.list_conversation("alice", "bob").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert_eq!(db.list_messages().unwrap().len(), 1);

        // Listing is a pure projection: storage still holds all three rows.
        assert_eq!(raw_count(&db), 3);
    }

    #[test]
    fn listing_twice_yields_identical_sequences() {
        let db = db();
        db.insert_message("alice", "bob", "hi", "2024-01-01T00:00:00Z").unwrap();
        db.insert_message("alice", "bob", "hi", "2024-01-01T00:00:00Z").unwrap();
        db.insert_message("bob", "alice", "hello", "2024-01-02T00:00:00Z").unwrap();

        let first: Vec<i64> = db.list_messages().unwrap().iter().map(|m| m.id).collect();
        let second: Vec<i64> = db.list_messages().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn conversation_is_bidirectional_and_oldest_first() {
        let db = db();
        db.insert_message("bob", "alice", "reply", "2024-01-02T00:00:00Z").unwrap();
        db.insert_message("alice", "bob", "first", "2024-01-01T00:00:00Z").unwrap();
        db.insert_message("carol", "bob", "noise", "2024-01-01T12:00:00Z").unwrap();

        let rows = db.list_conversation("alice", "bob").unwrap();
        let contents: Vec<&str> = rows.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "reply"]);
    }

    #[test]
    fn all_messages_order_newest_first_with_id_tiebreak() {
        let db = db();
        db.insert_message("alice", "bob", "a", "2024-01-01T00:00:00Z").unwrap();
        db.insert_message("alice", "bob", "b", "2024-01-01T00:00:00Z").unwrap();
        db.insert_message("alice", "bob", "c", "2024-01-02T00:00:00Z").unwrap();

        let ids: Vec<i64> = db.list_messages().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn user_listing_includes_broadcasts() {
        let db = db();
        db.insert_message("alice", "bob", "direct", "2024-01-01T00:00:00Z").unwrap();
        db.insert_message("carol", "all", "broadcast", "2024-01-02T00:00:00Z").unwrap();
        db.insert_message("carol", "dave", "other", "2024-01-03T00:00:00Z").unwrap();

        let rows = db.list_messages_for_user("bob").unwrap();
        let contents: Vec<&str> = rows.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["broadcast", "direct"]);
    }

    #[test]
    fn purge_keeps_minimum_id_and_is_idempotent() {
        let db = db();
        for _ in 0..3 {
            db.insert_message("alice", "bob", "hi", "2024-01-01T00:00:00Z").unwrap();
        }
        db.insert_message("bob", "alice", "unique", "2024-01-02T00:00:00Z").unwrap();

        assert_eq!(db.purge_duplicate_messages().unwrap(), 2);
        assert_eq!(raw_count(&db), 2);

        let rows = db.list_conversation("alice", "bob").unwrap();
        assert_eq!(rows[0].id, 1);

        assert_eq!(db.purge_duplicate_messages().unwrap(), 0);
        assert_eq!(raw_count(&db), 2);
    }
}
