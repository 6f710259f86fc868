//! Saved-episode history, one SQLite table keyed by the caller's identity.

use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

/// One saved episode.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub id: i64,
    pub user_id: String,
    pub topic: String,
    pub audio_url: Option<String>,
    pub created_at_ms: i64,
}

pub struct HistoryStore {
    conn: Mutex<Connection>,
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

impl HistoryStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS podcasts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                topic TEXT NOT NULL,
                audio_url TEXT,
                created_at_ms INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Appends one row for `user_id` and returns its id.
    pub fn append(
        &self,
        user_id: &str,
        topic: &str,
        audio_url: Option<&str>,
    ) -> Result<i64, rusqlite::Error> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO podcasts (user_id, topic, audio_url, created_at_ms)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, topic, audio_url, now_ms()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists the caller's rows, newest first.
    pub fn list(&self, user_id: &str) -> Result<Vec<HistoryRow>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT id, user_id, topic, audio_url, created_at_ms
             FROM podcasts WHERE user_id = ?1
             ORDER BY created_at_ms DESC, id DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(HistoryRow {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    topic: row.get(2)?,
                    audio_url: row.get(3)?,
                    created_at_ms: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_scoped_to_the_caller_and_newest_first() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.append("user-a", "경제 뉴스", None).unwrap();
        store
            .append("user-a", "기술 동향", Some("https://cdn.example/ep2.mp3"))
            .unwrap();
        store.append("user-b", "다른 사용자", None).unwrap();

        let rows = store.list("user-a").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].topic, "기술 동향");
        assert_eq!(
            rows[0].audio_url.as_deref(),
            Some("https://cdn.example/ep2.mp3")
        );
        assert_eq!(rows[1].topic, "경제 뉴스");
        assert!(store.list("user-c").unwrap().is_empty());
    }
}
