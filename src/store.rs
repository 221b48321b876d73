use crate::error::StoreError;
use crate::model::Message;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

/// Keyed persistence contract for messages: save-by-id (insert or overwrite),
/// find-by-id, delete-by-id and a sorted paged scan ordered by creation time
/// descending.
pub trait MessageStore: Send + Sync {
    fn save(&self, message: &Message) -> Result<(), StoreError>;
    fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, StoreError>;
    /// Returns true when a row was deleted.
    fn delete_by_id(&self, id: &Uuid) -> Result<bool, StoreError>;
    fn list_page(&self, offset: u64, limit: u64) -> Result<Vec<Message>, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
}

/// SQLite-backed store over a connection pool.
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: Uuid::parse_str(row.get::<_, String>(0)?.as_str()).unwrap_or_default(),
        author: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        like_count: row.get(4)?,
    })
}

impl MessageStore for SqliteStore {
    fn save(&self, message: &Message) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO messages (id, author, content, created_at, like_count) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(id) DO UPDATE SET \
               author = excluded.author, \
               content = excluded.content, \
               created_at = excluded.created_at, \
               like_count = excluded.like_count",
            params![
                message.id.to_string(),
                message.author,
                message.content,
                message.created_at,
                message.like_count
            ],
        )?;
        Ok(())
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, author, content, created_at, like_count FROM messages WHERE id = ?1",
        )?;
        let message = stmt
            .query_row([id.to_string()], row_to_message)
            .optional()?;
        Ok(message)
    }

    fn delete_by_id(&self, id: &Uuid) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let changed = conn.execute("DELETE FROM messages WHERE id = ?1", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn list_page(&self, offset: u64, limit: u64) -> Result<Vec<Message>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, author, content, created_at, like_count FROM messages \
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let iter = stmt.query_map(params![limit, offset], row_to_message)?;
        let mut messages = Vec::new();
        for m in iter {
            messages.push(m?);
        }
        Ok(messages)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
