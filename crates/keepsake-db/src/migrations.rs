use rusqlite::Connection;
use tracing::debug;

use crate::StoreResult;

pub fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS chat_messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            sender      TEXT NOT NULL,
            receiver    TEXT NOT NULL DEFAULT 'all',
            content     TEXT NOT NULL,
            timestamp   TEXT NOT NULL
        );

        -- Covers both duplicate-group scans and conversation lookups.
        CREATE INDEX IF NOT EXISTS idx_messages_dedup
            ON chat_messages(sender, receiver, content, timestamp);

        CREATE TABLE IF NOT EXISTS diaries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user        TEXT NOT NULL,
            date        TEXT NOT NULL,
            content     TEXT NOT NULL,
            timestamp   TEXT NOT NULL,
            tags        TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_diaries_date
            ON diaries(date);

        CREATE TABLE IF NOT EXISTS logs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp   TEXT NOT NULL,
            level       TEXT NOT NULL,
            user        TEXT NOT NULL,
            message     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_logs_timestamp
            ON logs(timestamp);

        CREATE TABLE IF NOT EXISTS anniversaries (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT NOT NULL,
            date            TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            photos          TEXT NOT NULL DEFAULT '',
            is_recurring    INTEGER NOT NULL DEFAULT 0,
            reminder_days   INTEGER NOT NULL DEFAULT 1,
            category        TEXT NOT NULL DEFAULT 'love',
            created_by      TEXT NOT NULL,
            create_time     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_anniversaries_created_by
            ON anniversaries(created_by);
        ",
    )?;

    debug!("Database migrations complete");
    Ok(())
}
