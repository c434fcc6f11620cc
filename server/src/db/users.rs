use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::models::User;

/// Look up a user by exact username. Equality filter: one row or none.
pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
        [username],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()
}

/// Insert a new user row and return its generated id.
/// The unique index on username rejects a concurrent duplicate here.
pub fn insert(conn: &Connection, username: &str, password_hash: &str) -> rusqlite::Result<String> {
    let id = Uuid::now_v7().to_string();
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO users (id, username, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![id, username, password_hash, now],
    )?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn conn() -> rusqlite::Connection {
        let mut conn = rusqlite::Connection::open_in_memory().expect("in-memory db");
        db::migrations::migrations()
            .to_latest(&mut conn)
            .expect("migrations");
        conn
    }

    #[test]
    fn insert_then_find_round_trips() {
        let conn = conn();
        let id = insert(&conn, "alice", "deadbeef").expect("insert");

        let user = find_by_username(&conn, "alice")
            .expect("query")
            .expect("user exists");
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "deadbeef");
    }

    #[test]
    fn find_missing_user_is_none() {
        let conn = conn();
        assert!(find_by_username(&conn, "nobody").expect("query").is_none());
    }

    #[test]
    fn duplicate_username_violates_unique_index() {
        let conn = conn();
        insert(&conn, "alice", "aa").expect("first insert");

        let err = insert(&conn, "alice", "bb").expect_err("second insert must fail");
        match err {
            rusqlite::Error::SqliteFailure(e, _) => {
                assert_eq!(e.code, rusqlite::ErrorCode::ConstraintViolation);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
