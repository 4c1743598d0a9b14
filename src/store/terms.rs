use crate::error::DomainResult;
use rusqlite::Connection;

pub fn insert_term(
    conn: &Connection,
    title: &str,
    position_from_top: i64,
) -> DomainResult<i64> {
    conn.execute(
        "INSERT INTO course_terms(title, position_from_top) VALUES(?, ?)",
        (title, position_from_top),
    )?;
    Ok(conn.last_insert_rowid())
}
