use crate::error::DomainError;
use crate::ipc::error::err;
use crate::models::{Course, User};
use crate::store::{auth_sessions, courses};
use rusqlite::Connection;
use serde_json::json;

/// Handler-internal error carrying the wire code. The code doubles as the
/// HTTP-status mapping for the outer application: `not_enrolled`,
/// `insufficient_role`, `unauthorized` render as 401, `not_found` as 404,
/// `already_exists` and `has_dependents` as 409, `bad_params` and
/// `invalid_path` as 400.
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> HandlerErr {
        HandlerErr {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<DomainError> for HandlerErr {
    fn from(e: DomainError) -> HandlerErr {
        match e {
            DomainError::AlreadyExists => HandlerErr::new("already_exists", e.to_string()),
            DomainError::NotFound => HandlerErr::new("not_found", e.to_string()),
            DomainError::Dependency => HandlerErr::new("has_dependents", e.to_string()),
            DomainError::InvalidPath(_) => HandlerErr::new("invalid_path", e.to_string()),
            DomainError::Sqlite(inner) => HandlerErr {
                code: "db_query_failed",
                message: inner.to_string(),
                details: None,
            },
        }
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

pub fn get_required_i64(params: &serde_json::Value, key: &str) -> Result<i64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

pub fn get_optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Resolves `params.sessionToken` to the acting user, once, before any
/// handler logic runs. Handlers never touch the token again.
pub fn require_user(conn: &Connection, params: &serde_json::Value) -> Result<User, HandlerErr> {
    let token = params
        .get("sessionToken")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::new("unauthorized", "missing sessionToken"))?;
    auth_sessions::user_for_token(conn, token)
        .map_err(HandlerErr::from)?
        .ok_or_else(|| HandlerErr::new("unauthorized", "unknown session token"))
}

/// Resolves `params.courseUrl` (the course's starting URL path) to the
/// course row and its id.
pub fn require_course(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<(i64, Course), HandlerErr> {
    let course_url = get_required_str(params, "courseUrl")?;
    let course = courses::find_by_starting_url(conn, &course_url)
        .map_err(HandlerErr::from)?
        .ok_or_else(|| HandlerErr {
            code: "not_found",
            message: "course not found".to_string(),
            details: Some(json!({ "courseUrl": course_url })),
        })?;
    let course_id = course
        .course_id
        .ok_or_else(|| HandlerErr::new("db_query_failed", "course row missing id"))?;
    Ok((course_id, course))
}
