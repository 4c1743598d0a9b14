use crate::error::{DomainError, DomainResult};
use crate::models::User;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

/// Credential row used by sign-in; the password hash never leaves this type.
pub struct UserCredentials {
    pub user_id: i64,
    pub user_uuid: String,
    pub full_name: String,
    pub password_hash: String,
}

fn user_from_row(r: &Row) -> rusqlite::Result<User> {
    Ok(User {
        user_id: r.get(0)?,
        user_uuid: r.get(1)?,
        full_name: r.get(2)?,
        email: r.get(3)?,
    })
}

pub fn insert_user(
    conn: &Connection,
    full_name: &str,
    email: &str,
    password_hash: &str,
) -> DomainResult<User> {
    let user_uuid = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO users(user_uuid, full_name, email, password_hash)
         VALUES(?, ?, ?, ?)",
        (&user_uuid, full_name, email, password_hash),
    )?;
    Ok(User {
        user_id: conn.last_insert_rowid(),
        user_uuid,
        full_name: full_name.to_string(),
        email: email.to_string(),
    })
}

pub fn find_by_uuid(conn: &Connection, user_uuid: &str) -> DomainResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT user_id, user_uuid, full_name, email
             FROM users
             WHERE user_uuid = ?",
            [user_uuid],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn credentials_by_email(
    conn: &Connection,
    email: &str,
) -> DomainResult<Option<UserCredentials>> {
    let creds = conn
        .query_row(
            "SELECT user_id, user_uuid, full_name, password_hash
             FROM users
             WHERE email = ?",
            [email],
            |r| {
                Ok(UserCredentials {
                    user_id: r.get(0)?,
                    user_uuid: r.get(1)?,
                    full_name: r.get(2)?,
                    password_hash: r.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(creds)
}

/// Deletes an account and its sign-in tokens. The user's enrollments, pages,
/// and attendance records are guards, not dependents: if any exist the
/// foreign keys reject the delete and it surfaces as `Dependency`.
pub fn delete_by_uuid(conn: &Connection, user_uuid: &str) -> DomainResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM auth_sessions
         WHERE user_id IN (SELECT user_id FROM users WHERE user_uuid = ?)",
        [user_uuid],
    )?;
    let affected = tx.execute("DELETE FROM users WHERE user_uuid = ?", [user_uuid])?;
    if affected < 1 {
        return Err(DomainError::NotFound);
    }
    tx.commit()?;
    Ok(())
}
