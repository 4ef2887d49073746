use chrono::Local;
use rusqlite::params;

use keepsake_types::api::NewAnniversaryRequest;

use crate::models::AnniversaryRow;
use crate::{Database, StoreError, StoreResult};

const ANNIVERSARY_COLUMNS: &str =
    "id, title, date, description, photos, is_recurring, reminder_days, category, created_by, create_time";

impl Database {
    /// Insert an event, applying defaults for the optional fields.
    /// `create_time` is assigned here, never by the caller.
    pub fn insert_anniversary(&self, req: &NewAnniversaryRequest) -> StoreResult<AnniversaryRow> {
        let create_time = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let row = AnniversaryRow {
            id: 0,
            title: req.title.clone(),
            date: req.date.clone(),
            description: req.description.clone().unwrap_or_default(),
            photos: req.photos.clone().unwrap_or_default(),
            is_recurring: req.is_recurring.unwrap_or(false),
            reminder_days: req.reminder_days.unwrap_or(1),
            category: req.category.clone().unwrap_or_else(|| "love".to_string()),
            created_by: req.created_by.clone(),
            create_time,
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO anniversaries
                     (title, date, description, photos, is_recurring, reminder_days, category, created_by, create_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    row.title,
                    row.date,
                    row.description,
                    row.photos,
                    row.is_recurring,
                    row.reminder_days,
                    row.category,
                    row.created_by,
                    row.create_time,
                ],
            )?;
            Ok(AnniversaryRow { id: conn.last_insert_rowid(), ..row })
        })
    }

    /// All events, optionally restricted to one creator, soonest origin date
    /// first.
    pub fn list_anniversaries(&self, created_by: Option<&str>) -> StoreResult<Vec<AnniversaryRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {ANNIVERSARY_COLUMNS} FROM anniversaries{} ORDER BY date ASC, id ASC",
                if created_by.is_some() { " WHERE created_by = ?1" } else { "" }
            );
            let mut stmt = conn.prepare(&sql)?;

            let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<AnniversaryRow> {
                Ok(AnniversaryRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    date: row.get(2)?,
                    description: row.get(3)?,
                    photos: row.get(4)?,
                    is_recurring: row.get(5)?,
                    reminder_days: row.get(6)?,
                    category: row.get(7)?,
                    created_by: row.get(8)?,
                    create_time: row.get(9)?,
                })
            };

            let rows = match created_by {
                Some(user) => stmt.query_map([user], map)?.collect::<Result<Vec<_>, _>>()?,
                None => stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?,
            };

            Ok(rows)
        })
    }

    pub fn get_anniversary(&self, id: i64) -> StoreResult<AnniversaryRow> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {ANNIVERSARY_COLUMNS} FROM anniversaries WHERE id = ?1"))?;
            let row = stmt.query_row([id], |row| {
                Ok(AnniversaryRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    date: row.get(2)?,
                    description: row.get(3)?,
                    photos: row.get(4)?,
                    is_recurring: row.get(5)?,
                    reminder_days: row.get(6)?,
                    category: row.get(7)?,
                    created_by: row.get(8)?,
                    create_time: row.get(9)?,
                })
            });

            match row {
                Ok(row) => Ok(row),
                Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(id)),
                Err(err) => Err(err.into()),
            }
        })
    }

    /// Full-field update; `create_time` keeps its original value.
    pub fn update_anniversary(&self, id: i64, req: &NewAnniversaryRequest) -> StoreResult<()> {
        self.with_conn(|conn| {
            let changes = conn.execute(
                "UPDATE anniversaries SET
                     title = ?1, date = ?2, description = ?3, photos = ?4,
                     is_recurring = ?5, reminder_days = ?6, category = ?7, created_by = ?8
                 WHERE id = ?9",
                params![
                    req.title,
                    req.date,
                    req.description.clone().unwrap_or_default(),
                    req.photos.clone().unwrap_or_default(),
                    req.is_recurring.unwrap_or(false),
                    req.reminder_days.unwrap_or(1),
                    req.category.clone().unwrap_or_else(|| "love".to_string()),
                    req.created_by,
                    id,
                ],
            )?;
            if changes == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
    }

    pub fn delete_anniversary(&self, id: i64) -> StoreResult<()> {
        self.with_conn(|conn| {
            let changes = conn.execute("DELETE FROM anniversaries WHERE id = ?1", [id])?;
            if changes == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, StoreError};
    use keepsake_types::api::NewAnniversaryRequest;

    fn request(title: &str, date: &str, created_by: &str) -> NewAnniversaryRequest {
        NewAnniversaryRequest {
            title: title.to_string(),
            date: date.to_string(),
            description: None,
            photos: None,
            is_recurring: None,
            reminder_days: None,
            category: None,
            created_by: created_by.to_string(),
        }
    }

    #[test]
    fn insert_applies_defaults_and_assigns_create_time() {
        let db = Database::open_in_memory().unwrap();
        let row = db.insert_anniversary(&request("first date", "2020-03-10", "alice")).unwrap();

        assert_eq!(row.id, 1);
        assert!(!row.is_recurring);
        assert_eq!(row.reminder_days, 1);
        assert_eq!(row.category, "love");
        assert_eq!(row.description, "");
        assert!(!row.create_time.is_empty());
    }

    #[test]
    fn list_filters_by_creator() {
        let db = Database::open_in_memory().unwrap();
        db.insert_anniversary(&request("a", "2020-01-01", "alice")).unwrap();
        db.insert_anniversary(&request("b", "2021-01-01", "bob")).unwrap();

        assert_eq!(db.list_anniversaries(None).unwrap().len(), 2);
        let rows = db.list_anniversaries(Some("bob")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "b");
    }

    #[test]
    fn update_rewrites_every_field_but_create_time() {
        let db = Database::open_in_memory().unwrap();
        let created = db.insert_anniversary(&request("old", "2020-01-01", "alice")).unwrap();

        let mut req = request("new", "2021-02-02", "alice");
        req.is_recurring = Some(true);
        req.category = Some("milestone".to_string());
        db.update_anniversary(created.id, &req).unwrap();

        let row = db.get_anniversary(created.id).unwrap();
        assert_eq!(row.title, "new");
        assert_eq!(row.date, "2021-02-02");
        assert!(row.is_recurring);
        assert_eq!(row.category, "milestone");
        assert_eq!(row.create_time, created.create_time);
    }

    #[test]
    fn missing_ids_surface_as_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_anniversary(7), Err(StoreError::NotFound(7))));
        assert!(matches!(
            db.update_anniversary(7, &request("x", "2020-01-01", "alice")),
            Err(StoreError::NotFound(7))
        ));
        assert!(matches!(db.delete_anniversary(7), Err(StoreError::NotFound(7))));
    }
}
