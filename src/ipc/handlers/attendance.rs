use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_required_i64, get_required_str, require_course, require_user, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::models::{AttendanceRecordStatus, AttendanceSession, Role};
use crate::store::{attendance, enrollments, users};
use rusqlite::Connection;
use serde_json::json;

/// Attendance is instructor-facing: every method needs at least Assistant
/// in the course.
fn require_staff(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<i64, HandlerErr> {
    let actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    match enrollments::role_for_user(conn, actor.user_id, course_id)? {
        None => Err(HandlerErr::new("not_enrolled", "not enrolled in course")),
        Some(role) if role < Role::Assistant => Err(HandlerErr::new(
            "insufficient_role",
            "role does not permit attendance management",
        )),
        Some(_) => Ok(course_id),
    }
}

/// Sessions are addressed by id but scoped to the course the actor was
/// authorized in; an id from another course reads as missing.
fn require_course_session(
    conn: &Connection,
    course_id: i64,
    params: &serde_json::Value,
) -> Result<i64, HandlerErr> {
    let session_id = get_required_i64(params, "sessionId")?;
    match attendance::find_session(conn, session_id)? {
        Some(session) if session.course_id == course_id => Ok(session_id),
        _ => Err(HandlerErr::new("not_found", "attendance session not found")),
    }
}

fn session_json(session: &AttendanceSession) -> serde_json::Value {
    json!({
        "sessionId": session.attendance_session_id,
        "title": session.title,
        "openingTime": session.opening_time,
        "closingTime": session.closing_time,
    })
}

fn start(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = require_staff(conn, params)?;
    let session_id = attendance::start_session(conn, course_id)?;
    tracing::info!(course_id, session_id, "attendance session opened");
    Ok(json!({ "sessionId": session_id }))
}

fn close(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = require_staff(conn, params)?;
    let session_id = require_course_session(conn, course_id, params)?;
    attendance::close_session(conn, session_id)?;
    Ok(json!({ "closed": true }))
}

fn edit_title(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = require_staff(conn, params)?;
    let session_id = require_course_session(conn, course_id, params)?;
    let new_title = get_required_str(params, "newTitle")?;
    attendance::edit_session_title(conn, session_id, &new_title)?;
    Ok(json!({ "title": new_title }))
}

fn set_record_status(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = require_staff(conn, params)?;
    let session_id = require_course_session(conn, course_id, params)?;
    let user_uuid = get_required_str(params, "userUuid")?;
    let raw_status = get_required_i64(params, "status")?;
    let status = AttendanceRecordStatus::from_i64(raw_status).ok_or_else(|| {
        HandlerErr::new("bad_params", format!("unknown status {}", raw_status))
    })?;
    let target = users::find_by_uuid(conn, &user_uuid)?
        .ok_or_else(|| HandlerErr::new("not_found", "user not found"))?;
    attendance::update_record_status(conn, session_id, target.user_id, status)?;
    Ok(json!({ "status": status.as_i64() }))
}

fn delete(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = require_staff(conn, params)?;
    let session_id = require_course_session(conn, course_id, params)?;
    attendance::delete_session(conn, session_id)?;
    Ok(json!({ "deleted": true }))
}

fn list_sessions(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = require_staff(conn, params)?;
    let active = attendance::list_active(conn, course_id)?;
    let closed = attendance::list_closed(conn, course_id)?;
    Ok(json!({
        "active": active.iter().map(session_json).collect::<Vec<_>>(),
        "closed": closed.iter().map(session_json).collect::<Vec<_>>(),
    }))
}

fn records(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = require_staff(conn, params)?;
    let session_id = require_course_session(conn, course_id, params)?;
    let records = attendance::records_with_names(conn, session_id)?;
    let records_json: Vec<serde_json::Value> = records
        .iter()
        .map(|r| {
            json!({
                "userUuid": r.user_uuid,
                "fullName": r.full_name,
                "status": r.status.as_i64(),
            })
        })
        .collect();
    Ok(json!({ "records": records_json }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.start" => start(&state.conn, &req.params),
        "attendance.close" => close(&state.conn, &req.params),
        "attendance.editTitle" => edit_title(&state.conn, &req.params),
        "attendance.setRecordStatus" => set_record_status(&state.conn, &req.params),
        "attendance.delete" => delete(&state.conn, &req.params),
        "attendance.listSessions" => list_sessions(&state.conn, &req.params),
        "attendance.records" => records(&state.conn, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
