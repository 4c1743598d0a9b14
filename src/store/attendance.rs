use crate::error::{DomainError, DomainResult};
use crate::models::{
    AttendanceRecordStatus, AttendanceRecordWithName, AttendanceSession, Role,
};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};

fn session_from_row(r: &Row) -> rusqlite::Result<AttendanceSession> {
    Ok(AttendanceSession {
        attendance_session_id: r.get(0)?,
        course_id: r.get(1)?,
        title: r.get(2)?,
        opening_time: r.get(3)?,
        closing_time: r.get(4)?,
    })
}

/// Opens a session and fans out one status=None record per currently
/// enrolled Student, in one transaction; a partial failure rolls back the
/// session row too. Assistants and professors get no record.
pub fn start_session(conn: &Connection, course_id: i64) -> DomainResult<i64> {
    let now = Utc::now();
    let title = now.format("%Y.%m.%d %H:%M").to_string();

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO attendance_sessions(course_id, title, opening_time, closing_time)
         VALUES(?, ?, ?, NULL)",
        (course_id, &title, now.to_rfc3339()),
    )?;
    let session_id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO attendance_records(attendance_session_id, user_id, status)
         SELECT ?, user_id, ?
         FROM enrollments
         WHERE course_id = ? AND role = ?",
        (
            session_id,
            AttendanceRecordStatus::None.as_i64(),
            course_id,
            Role::Student.as_i64(),
        ),
    )?;
    tx.commit()?;
    Ok(session_id)
}

/// Closes an in-progress session. The precondition count runs before the
/// write, so an already-closed or unknown session fails with `NotFound`.
pub fn close_session(conn: &Connection, session_id: i64) -> DomainResult<()> {
    let open_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance_sessions
         WHERE attendance_session_id = ? AND closing_time IS NULL",
        [session_id],
        |r| r.get(0),
    )?;
    if open_count < 1 {
        return Err(DomainError::NotFound);
    }
    conn.execute(
        "UPDATE attendance_sessions SET closing_time = ? WHERE attendance_session_id = ?",
        (Utc::now().to_rfc3339(), session_id),
    )?;
    Ok(())
}

/// Renaming is allowed in any state, open or closed.
pub fn edit_session_title(
    conn: &Connection,
    session_id: i64,
    new_title: &str,
) -> DomainResult<()> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance_sessions WHERE attendance_session_id = ?",
        [session_id],
        |r| r.get(0),
    )?;
    if count < 1 {
        return Err(DomainError::NotFound);
    }
    conn.execute(
        "UPDATE attendance_sessions SET title = ? WHERE attendance_session_id = ?",
        (new_title, session_id),
    )?;
    Ok(())
}

/// Records exist only from session-open fan-out; a miss here means the user
/// was not an enrolled student when the session opened.
pub fn update_record_status(
    conn: &Connection,
    session_id: i64,
    user_id: i64,
    status: AttendanceRecordStatus,
) -> DomainResult<()> {
    let affected = conn.execute(
        "UPDATE attendance_records
         SET status = ?
         WHERE attendance_session_id = ? AND user_id = ?",
        (status.as_i64(), session_id, user_id),
    )?;
    if affected < 1 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}

/// Removes the session and its records as one unit. NotFound is decided by
/// the session delete's affected-row count, after the delete.
pub fn delete_session(conn: &Connection, session_id: i64) -> DomainResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM attendance_records WHERE attendance_session_id = ?",
        [session_id],
    )?;
    let affected = tx.execute(
        "DELETE FROM attendance_sessions WHERE attendance_session_id = ?",
        [session_id],
    )?;
    if affected < 1 {
        return Err(DomainError::NotFound);
    }
    tx.commit()?;
    Ok(())
}

pub fn find_session(
    conn: &Connection,
    session_id: i64,
) -> DomainResult<Option<AttendanceSession>> {
    let session = conn
        .query_row(
            "SELECT attendance_session_id, course_id, title, opening_time, closing_time
             FROM attendance_sessions
             WHERE attendance_session_id = ?",
            [session_id],
            session_from_row,
        )
        .optional()?;
    Ok(session)
}

pub fn list_active(conn: &Connection, course_id: i64) -> DomainResult<Vec<AttendanceSession>> {
    list_sessions(conn, course_id, true)
}

pub fn list_closed(conn: &Connection, course_id: i64) -> DomainResult<Vec<AttendanceSession>> {
    list_sessions(conn, course_id, false)
}

fn list_sessions(
    conn: &Connection,
    course_id: i64,
    active: bool,
) -> DomainResult<Vec<AttendanceSession>> {
    let null_check = if active { "IS NULL" } else { "IS NOT NULL" };
    let mut stmt = conn.prepare(&format!(
        "SELECT attendance_session_id, course_id, title, opening_time, closing_time
         FROM attendance_sessions
         WHERE course_id = ? AND closing_time {null_check}
         ORDER BY opening_time DESC"
    ))?;
    let sessions = stmt
        .query_map([course_id], session_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sessions)
}

pub fn records_with_names(
    conn: &Connection,
    session_id: i64,
) -> DomainResult<Vec<AttendanceRecordWithName>> {
    let mut stmt = conn.prepare(
        "SELECT u.user_uuid, u.full_name, r.status
         FROM attendance_records r
         JOIN users u ON u.user_id = r.user_id
         WHERE r.attendance_session_id = ?
         ORDER BY u.full_name ASC",
    )?;
    let records = stmt
        .query_map([session_id], |r| {
            let raw_status: i64 = r.get(2)?;
            let status = AttendanceRecordStatus::from_i64(raw_status)
                .ok_or(rusqlite::Error::IntegralValueOutOfRange(2, raw_status))?;
            Ok(AttendanceRecordWithName {
                user_uuid: r.get(0)?,
                full_name: r.get(1)?,
                status,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}
