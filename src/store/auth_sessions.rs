use crate::error::{DomainError, DomainResult};
use crate::models::User;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

/// Mints a fresh opaque sign-in token for the user.
pub fn create_for_user(conn: &Connection, user_id: i64) -> DomainResult<String> {
    let token = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO auth_sessions(token, user_id, created_at) VALUES(?, ?, ?)",
        (&token, user_id, Utc::now().to_rfc3339()),
    )?;
    Ok(token)
}

/// Resolves a token to its user. `None` means the token is unknown (signed
/// out or never issued); the request layer maps that to `unauthorized`.
pub fn user_for_token(conn: &Connection, token: &str) -> DomainResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT u.user_id, u.user_uuid, u.full_name, u.email
             FROM auth_sessions s
             JOIN users u ON u.user_id = s.user_id
             WHERE s.token = ?",
            [token],
            |r| {
                Ok(User {
                    user_id: r.get(0)?,
                    user_uuid: r.get(1)?,
                    full_name: r.get(2)?,
                    email: r.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn delete(conn: &Connection, token: &str) -> DomainResult<()> {
    let affected = conn.execute("DELETE FROM auth_sessions WHERE token = ?", [token])?;
    if affected < 1 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}
