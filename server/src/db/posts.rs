use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use super::models::Post;

/// List all posts, newest first.
pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Post>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, author, created_at FROM posts ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Post {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            author: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    rows.collect()
}

/// Insert a new post row and return its generated id.
pub fn insert(
    conn: &Connection,
    title: &str,
    content: &str,
    author: &str,
) -> rusqlite::Result<String> {
    let id = Uuid::now_v7().to_string();
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO posts (id, title, content, author, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id, title, content, author, now],
    )?;
    Ok(id)
}

/// Number of post rows. Used by tests to assert no insert happened.
pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
}
