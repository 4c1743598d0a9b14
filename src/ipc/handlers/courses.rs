use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_required_i64, get_required_str, require_course, require_user, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::models::{Course, Role};
use crate::store::{courses, enrollments, terms, users};
use rusqlite::Connection;
use serde_json::json;

fn course_json(course: &Course) -> serde_json::Value {
    json!({
        "title": course.title,
        "classCode": course.class_code,
        "startingUrlPath": course.starting_url_path,
        "termId": course.course_term_id,
    })
}

fn list_for_user(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let user = require_user(conn, params)?;
    let grouped = courses::terms_with_courses_for_user(conn, user.user_id)?;
    let terms_json: Vec<serde_json::Value> = grouped
        .iter()
        .map(|entry| {
            json!({
                "termId": entry.term.course_term_id,
                "title": entry.term.title,
                "positionFromTop": entry.term.position_from_top,
                "courses": entry.courses.iter().map(course_json).collect::<Vec<_>>(),
            })
        })
        .collect();
    Ok(json!({ "terms": terms_json }))
}

fn create_course(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let _actor = require_user(conn, params)?;
    let course = Course {
        course_id: None,
        title: get_required_str(params, "title")?,
        class_code: get_required_str(params, "classCode")?,
        starting_url_path: get_required_str(params, "startingUrlPath")?,
        course_term_id: params.get("termId").and_then(|v| v.as_i64()),
    };
    courses::insert_course(conn, &course)?;
    Ok(json!({ "startingUrlPath": course.starting_url_path }))
}

fn update_course(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let _actor = require_user(conn, params)?;
    let (course_id, existing) = require_course(conn, params)?;
    let updated = Course {
        course_id: Some(course_id),
        title: get_required_str(params, "title")?,
        class_code: get_required_str(params, "classCode")?,
        starting_url_path: params
            .get("newStartingUrlPath")
            .and_then(|v| v.as_str())
            .unwrap_or(&existing.starting_url_path)
            .to_string(),
        course_term_id: params.get("termId").and_then(|v| v.as_i64()),
    };
    courses::update_metadata(conn, &updated)?;
    Ok(json!({ "startingUrlPath": updated.starting_url_path }))
}

fn delete_course(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let _actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    courses::delete_course(conn, course_id)?;
    Ok(json!({ "deleted": true }))
}

fn create_term(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let _actor = require_user(conn, params)?;
    let title = get_required_str(params, "title")?;
    let position = get_required_i64(params, "positionFromTop")?;
    let term_id = terms::insert_term(conn, &title, position)?;
    Ok(json!({ "termId": term_id }))
}

fn set_enrollment(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let _actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    let user_uuid = get_required_str(params, "userUuid")?;
    let raw_role = get_required_i64(params, "role")?;
    let role = Role::from_i64(raw_role)
        .ok_or_else(|| HandlerErr::new("bad_params", format!("unknown role {}", raw_role)))?;
    let target = users::find_by_uuid(conn, &user_uuid)?
        .ok_or_else(|| HandlerErr::new("not_found", "user not found"))?;
    enrollments::set_enrollment(conn, course_id, target.user_id, role)?;
    Ok(json!({ "role": role.as_i64() }))
}

fn remove_enrollment(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let _actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    let user_uuid = get_required_str(params, "userUuid")?;
    let target = users::find_by_uuid(conn, &user_uuid)?
        .ok_or_else(|| HandlerErr::new("not_found", "user not found"))?;
    enrollments::remove_enrollment(conn, course_id, target.user_id)?;
    Ok(json!({ "removed": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "courses.listForUser" => list_for_user(&state.conn, &req.params),
        "courses.create" => create_course(&state.conn, &req.params),
        "courses.update" => update_course(&state.conn, &req.params),
        "courses.delete" => delete_course(&state.conn, &req.params),
        "terms.create" => create_term(&state.conn, &req.params),
        "enrollments.set" => set_enrollment(&state.conn, &req.params),
        "enrollments.remove" => remove_enrollment(&state.conn, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
