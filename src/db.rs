use std::path::Path;

use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

/// Open a pooled connection to the SQLite database and apply the schema.
pub fn open_pool<P: AsRef<Path>>(path: P) -> Result<Pool<SqliteConnectionManager>> {
    let manager =
        SqliteConnectionManager::file(path).with_init(|conn| conn.execute_batch(SCHEMA));
    Ok(Pool::new(manager)?)
}

/// In-memory pool for tests. Capped at one connection so every caller sees
/// the same database.
pub fn memory_pool() -> Result<Pool<SqliteConnectionManager>> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| conn.execute_batch(SCHEMA));
    Ok(Pool::builder().max_size(1).build(manager)?)
}

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
  id TEXT PRIMARY KEY,
  author TEXT NOT NULL,
  content TEXT NOT NULL,
  created_at INTEGER NOT NULL,
  like_count INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_messages_created_at
  ON messages (created_at DESC, id DESC);
"#;
