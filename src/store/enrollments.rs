use crate::error::{DomainError, DomainResult};
use crate::models::Role;
use rusqlite::{Connection, OptionalExtension};

pub fn role_for_user(
    conn: &Connection,
    user_id: i64,
    course_id: i64,
) -> DomainResult<Option<Role>> {
    let raw: Option<i64> = conn
        .query_row(
            "SELECT role FROM enrollments WHERE user_id = ? AND course_id = ?",
            (user_id, course_id),
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        None => Ok(None),
        Some(v) => match Role::from_i64(v) {
            Some(role) => Ok(Some(role)),
            None => Err(DomainError::Sqlite(rusqlite::Error::IntegralValueOutOfRange(0, v))),
        },
    }
}

/// Inserts the enrollment, or updates the role of an existing one; unique
/// per (course, user) either way.
pub fn set_enrollment(
    conn: &Connection,
    course_id: i64,
    user_id: i64,
    role: Role,
) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO enrollments(course_id, user_id, role)
         VALUES(?, ?, ?)
         ON CONFLICT(course_id, user_id) DO UPDATE SET role = excluded.role",
        (course_id, user_id, role.as_i64()),
    )?;
    Ok(())
}

pub fn remove_enrollment(conn: &Connection, course_id: i64, user_id: i64) -> DomainResult<()> {
    let affected = conn.execute(
        "DELETE FROM enrollments WHERE course_id = ? AND user_id = ?",
        (course_id, user_id),
    )?;
    if affected < 1 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}
