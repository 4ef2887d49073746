use rusqlite::{params, types::ToSql};

use crate::models::DiaryRow;
use crate::{Database, StoreError, StoreResult};

impl Database {
    pub fn insert_diary(
        &self,
        user: &str,
        date: &str,
        content: &str,
        timestamp: &str,
        tags: &str,
    ) -> StoreResult<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO diaries (user, date, content, timestamp, tags) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user, date, content, timestamp, tags],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_diaries(&self) -> StoreResult<Vec<DiaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user, date, content, timestamp, tags FROM diaries
                 ORDER BY timestamp DESC, id DESC",
            )?;
            collect_diaries(stmt.query_map([], map_diary_row)?)
        })
    }

    /// Filtered diary search. Every filter is optional; `keyword` matches
    /// content or tags as a substring, date bounds are inclusive on the
    /// entry's own `date` column.
    pub fn search_diaries(
        &self,
        keyword: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        user: Option<&str>,
    ) -> StoreResult<Vec<DiaryRow>> {
        let mut sql =
            String::from("SELECT id, user, date, content, timestamp, tags FROM diaries WHERE 1=1");
        let mut args: Vec<String> = Vec::new();

        if let Some(keyword) = keyword {
            sql.push_str(&format!(
                " AND (content LIKE ?{n} OR tags LIKE ?{m})",
                n = args.len() + 1,
                m = args.len() + 2
            ));
            let pattern = format!("%{keyword}%");
            args.push(pattern.clone());
            args.push(pattern);
        }
        if let Some(start) = start_date {
            sql.push_str(&format!(" AND date >= ?{}", args.len() + 1));
            args.push(start.to_string());
        }
        if let Some(end) = end_date {
            sql.push_str(&format!(" AND date <= ?{}", args.len() + 1));
            args.push(end.to_string());
        }
        if let Some(user) = user {
            sql.push_str(&format!(" AND user = ?{}", args.len() + 1));
            args.push(user.to_string());
        }

        sql.push_str(" ORDER BY timestamp DESC, id DESC");

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn ToSql> = args.iter().map(|a| a as &dyn ToSql).collect();
            collect_diaries(stmt.query_map(params.as_slice(), map_diary_row)?)
        })
    }

    pub fn update_diary(&self, id: i64, content: &str, tags: &str) -> StoreResult<()> {
        self.with_conn(|conn| {
            let changes = conn.execute(
                "UPDATE diaries SET content = ?1, tags = ?2 WHERE id = ?3",
                params![content, tags, id],
            )?;
            if changes == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
    }

    pub fn delete_diary(&self, id: i64) -> StoreResult<()> {
        self.with_conn(|conn| {
            let changes = conn.execute("DELETE FROM diaries WHERE id = ?1", [id])?;
            if changes == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
    }
}

fn map_diary_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiaryRow> {
    Ok(DiaryRow {
        id: row.get(0)?,
        user: row.get(1)?,
        date: row.get(2)?,
        content: row.get(3)?,
        timestamp: row.get(4)?,
        tags: row.get(5)?,
    })
}

fn collect_diaries(
    rows: rusqlite::MappedRows<'_, impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<DiaryRow>>,
) -> StoreResult<Vec<DiaryRow>> {
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use crate::{Database, StoreError};

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert_diary("alice", "2024-01-01", "first snow", "2024-01-01T20:00:00Z", "winter")
            .unwrap();
        db.insert_diary("bob", "2024-02-14", "made dinner", "2024-02-14T21:00:00Z", "food,love")
            .unwrap();
        db.insert_diary("alice", "2024-03-01", "spring walk", "2024-03-01T19:00:00Z", "")
            .unwrap();
        db
    }

    #[test]
    fn list_orders_newest_first() {
        let db = seeded();
        let rows = db.list_diaries().unwrap();
        let dates: Vec<&str> = rows.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-14", "2024-01-01"]);
    }

    #[test]
    fn search_filters_compose() {
        let db = seeded();

        let rows = db.search_diaries(Some("snow"), None, None, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "first snow");

        // Keyword also matches tags.
        let rows = db.search_diaries(Some("food"), None, None, None).unwrap();
        assert_eq!(rows.len(), 1);

        let rows = db
            .search_diaries(None, Some("2024-02-01"), Some("2024-02-28"), None)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user, "bob");

        let rows = db
            .search_diaries(None, Some("2024-01-01"), None, Some("alice"))
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let db = seeded();

        db.update_diary(1, "first snow, edited", "winter").unwrap();
        let rows = db.search_diaries(Some("edited"), None, None, None).unwrap();
        assert_eq!(rows.len(), 1);

        assert!(matches!(db.update_diary(999, "x", ""), Err(StoreError::NotFound(999))));
        assert!(matches!(db.delete_diary(999), Err(StoreError::NotFound(999))));

        db.delete_diary(1).unwrap();
        assert_eq!(db.list_diaries().unwrap().len(), 2);
    }
}
