use crate::gate::{decide, Decision, DenyReason, PageAction};
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_optional_str, get_required_i64, get_required_str, require_course, require_user,
    HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::models::{Page, PageNavigationLink, VisibilitySetting};
use crate::nav;
use crate::store::{enrollments, pages};
use rusqlite::Connection;
use serde_json::json;

fn deny_err(reason: DenyReason) -> HandlerErr {
    match reason {
        DenyReason::NotEnrolled => HandlerErr::new("not_enrolled", "not enrolled in course"),
        DenyReason::InsufficientRole => {
            HandlerErr::new("insufficient_role", "role does not permit this action")
        }
        DenyReason::NotFound => HandlerErr::new("not_found", "page not found"),
    }
}

fn nav_json(links: &[PageNavigationLink]) -> Vec<serde_json::Value> {
    links
        .iter()
        .map(|link| {
            json!({
                "title": link.title,
                "path": link.url_path_after_course_path,
                "nestedLinks": nav_json(&link.nested_links),
            })
        })
        .collect()
}

fn page_json(page: &Page) -> serde_json::Value {
    json!({
        "path": page.url_path_after_course_path,
        "title": page.title,
        "content": page.content,
        "visibility": page.visibility.as_i64(),
    })
}

/// Serves both the course home (`path: "/"`) and every nested static page.
/// A missing page is not a bare failure: the caller still gets the course
/// layout (navigation) with `found: false`, rendered inline.
fn view(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    let path = get_required_str(params, "path")?;

    let role = enrollments::role_for_user(conn, actor.user_id, course_id)?;
    let page = pages::find_by_course_and_path(conn, course_id, &path)?;

    match decide(role, PageAction::View, page.as_ref().map(|p| p.visibility)) {
        Decision::Allow => {
            let navigation = nav::navigation_tree(conn, course_id)?;
            let page = page.ok_or_else(|| HandlerErr::new("not_found", "page not found"))?;
            Ok(json!({
                "found": true,
                "page": page_json(&page),
                "navigation": nav_json(&navigation),
            }))
        }
        Decision::Deny(DenyReason::NotFound) => {
            let navigation = nav::navigation_tree(conn, course_id)?;
            Ok(json!({
                "found": false,
                "navigation": nav_json(&navigation),
            }))
        }
        Decision::Deny(reason) => Err(deny_err(reason)),
    }
}

fn create(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    let path = get_required_str(params, "path")?;
    let title = get_required_str(params, "title")?;
    let content = get_required_str(params, "content")?;
    let raw_visibility = get_required_i64(params, "visibility")?;
    let visibility = VisibilitySetting::from_i64(raw_visibility).ok_or_else(|| {
        HandlerErr::new("bad_params", format!("unknown visibility {}", raw_visibility))
    })?;

    let role = enrollments::role_for_user(conn, actor.user_id, course_id)?;
    if let Decision::Deny(reason) = decide(role, PageAction::Create, None) {
        return Err(deny_err(reason));
    }

    let page = Page::new(
        course_id,
        path,
        title,
        content,
        visibility,
        Some(actor.user_id),
    )?;
    pages::insert_page(conn, &page)?;
    Ok(json!({ "path": page.url_path_after_course_path }))
}

fn edit(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    let path = get_required_str(params, "path")?;
    let title = get_required_str(params, "title")?;
    let content = get_required_str(params, "content")?;
    let raw_visibility = get_required_i64(params, "visibility")?;
    let visibility = VisibilitySetting::from_i64(raw_visibility).ok_or_else(|| {
        HandlerErr::new("bad_params", format!("unknown visibility {}", raw_visibility))
    })?;

    let role = enrollments::role_for_user(conn, actor.user_id, course_id)?;
    let existing = pages::find_by_course_and_path(conn, course_id, &path)?;

    match decide(
        role,
        PageAction::Edit,
        existing.as_ref().map(|p| p.visibility),
    ) {
        Decision::Allow => {}
        Decision::Deny(reason) => return Err(deny_err(reason)),
    }
    let existing = existing.ok_or_else(|| HandlerErr::new("not_found", "page not found"))?;

    // Re-validated through the constructor, also when the path is unchanged.
    let new_path = get_optional_str(params, "newPath").unwrap_or(path);
    let mut updated = Page::new(
        course_id,
        new_path,
        title,
        content,
        visibility,
        existing.created_by_user_id,
    )?;
    updated.page_id = existing.page_id;
    pages::update_page(conn, &updated)?;
    Ok(json!({ "path": updated.url_path_after_course_path }))
}

fn delete(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let actor = require_user(conn, params)?;
    let (course_id, _course) = require_course(conn, params)?;
    let path = get_required_str(params, "path")?;

    let role = enrollments::role_for_user(conn, actor.user_id, course_id)?;
    let existing = pages::find_by_course_and_path(conn, course_id, &path)?;

    match decide(
        role,
        PageAction::Delete,
        existing.as_ref().map(|p| p.visibility),
    ) {
        Decision::Allow => {}
        Decision::Deny(reason) => return Err(deny_err(reason)),
    }
    let existing = existing.ok_or_else(|| HandlerErr::new("not_found", "page not found"))?;
    let page_id = existing
        .page_id
        .ok_or_else(|| HandlerErr::new("db_query_failed", "page row missing id"))?;
    pages::delete_page(conn, page_id)?;
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "pages.view" => view(&state.conn, &req.params),
        "pages.create" => create(&state.conn, &req.params),
        "pages.edit" => edit(&state.conn, &req.params),
        "pages.delete" => delete(&state.conn, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
