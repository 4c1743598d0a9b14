use crate::error::DomainError;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, require_user, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{auth_sessions, users};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::Connection;
use serde_json::json;

fn sign_up(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let full_name = get_required_str(params, "fullName")?;
    let email = get_required_str(params, "email")?;
    let password = get_required_str(params, "password")?;
    if full_name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(HandlerErr::new(
            "bad_params",
            "fullName, email and password must not be empty",
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| HandlerErr::new("password_hash_failed", e.to_string()))?
        .to_string();

    let tx = conn.unchecked_transaction().map_err(DomainError::from)?;
    let user = users::insert_user(&tx, full_name.trim(), email.trim(), &password_hash)?;
    let token = auth_sessions::create_for_user(&tx, user.user_id)?;
    tx.commit().map_err(DomainError::from)?;

    tracing::info!(user = %user.user_uuid, "account created");
    Ok(json!({
        "userUuid": user.user_uuid,
        "fullName": user.full_name,
        "sessionToken": token
    }))
}

fn sign_in(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let email = get_required_str(params, "email")?;
    let password = get_required_str(params, "password")?;

    // Same response for unknown email and wrong password.
    let denied = || HandlerErr::new("unauthorized", "invalid email or password");

    let creds = users::credentials_by_email(conn, email.trim())?.ok_or_else(denied)?;
    let parsed_hash = PasswordHash::new(&creds.password_hash)
        .map_err(|e| HandlerErr::new("password_hash_failed", e.to_string()))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(denied());
    }

    let token = auth_sessions::create_for_user(conn, creds.user_id)?;
    Ok(json!({
        "userUuid": creds.user_uuid,
        "fullName": creds.full_name,
        "sessionToken": token
    }))
}

/// The signed-in identity, as shown in the outer application's header.
fn me(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let user = require_user(conn, params)?;
    Ok(json!({
        "userUuid": user.user_uuid,
        "fullName": user.full_name,
        "email": user.email
    }))
}

fn sign_out(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let token = get_required_str(params, "sessionToken")?;
    auth_sessions::delete(conn, &token).map_err(|e| match e {
        DomainError::NotFound => HandlerErr::new("unauthorized", "no active session for token"),
        other => HandlerErr::from(other),
    })?;
    Ok(json!({ "signedOut": true }))
}

fn delete_user(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let _actor = require_user(conn, params)?;
    let user_uuid = get_required_str(params, "userUuid")?;
    users::delete_by_uuid(conn, &user_uuid)?;
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "auth.signUp" => sign_up(&state.conn, &req.params),
        "auth.signIn" => sign_in(&state.conn, &req.params),
        "auth.signOut" => sign_out(&state.conn, &req.params),
        "auth.me" => me(&state.conn, &req.params),
        "users.delete" => delete_user(&state.conn, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
