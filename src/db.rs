use rusqlite::Connection;
use std::path::Path;

pub fn open_db(db_path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates the schema on a fresh database; a no-op on an existing one.
/// Referential integrity is enforced, never cascaded: deleting a row with
/// dependents fails at the engine and surfaces as `Dependency`.
pub fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users(
            user_id INTEGER PRIMARY KEY,
            user_uuid TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS auth_sessions(
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(user_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_auth_sessions_user ON auth_sessions(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_terms(
            course_term_id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            position_from_top INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses(
            course_id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            class_code TEXT NOT NULL,
            starting_url_path TEXT NOT NULL UNIQUE,
            course_term_id INTEGER,
            FOREIGN KEY(course_term_id) REFERENCES course_terms(course_term_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_courses_term ON courses(course_term_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS enrollments(
            course_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            role INTEGER NOT NULL,
            PRIMARY KEY(course_id, user_id),
            FOREIGN KEY(course_id) REFERENCES courses(course_id),
            FOREIGN KEY(user_id) REFERENCES users(user_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_enrollments_user ON enrollments(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS pages(
            page_id INTEGER PRIMARY KEY,
            course_id INTEGER NOT NULL,
            url_path_after_course_path TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            visibility INTEGER NOT NULL,
            created_by_user_id INTEGER,
            UNIQUE(course_id, url_path_after_course_path),
            FOREIGN KEY(course_id) REFERENCES courses(course_id),
            FOREIGN KEY(created_by_user_id) REFERENCES users(user_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pages_course ON pages(course_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance_sessions(
            attendance_session_id INTEGER PRIMARY KEY,
            course_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            opening_time TEXT NOT NULL,
            closing_time TEXT,
            FOREIGN KEY(course_id) REFERENCES courses(course_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_sessions_course
         ON attendance_sessions(course_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance_records(
            attendance_session_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            status INTEGER NOT NULL,
            PRIMARY KEY(attendance_session_id, user_id),
            FOREIGN KEY(attendance_session_id)
                REFERENCES attendance_sessions(attendance_session_id),
            FOREIGN KEY(user_id) REFERENCES users(user_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_records_user
         ON attendance_records(user_id)",
        [],
    )?;

    Ok(())
}
