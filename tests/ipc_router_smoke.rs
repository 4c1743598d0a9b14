mod test_support;

use serde_json::json;
use test_support::{request, request_ok, sign_up, spawn_sidecar, temp_dir};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("coursebookd-router-smoke");
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&workspace);

    let _ = request(&mut stdin, &mut reader, "1", "health", json!({}));

    let (prof_uuid, prof_token) = sign_up(
        &mut stdin,
        &mut reader,
        "2",
        "Ada Lovelace",
        "ada@example.edu",
    );

    let term = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "terms.create",
        json!({ "sessionToken": prof_token, "title": "Fall 2024", "positionFromTop": 1 }),
    );
    let term_id = term.get("termId").and_then(|v| v.as_i64()).expect("termId");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "courses.create",
        json!({
            "sessionToken": prof_token,
            "title": "Database Management",
            "classCode": "CPSC 408",
            "startingUrlPath": "/cpsc-408-f24",
            "termId": term_id
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "enrollments.set",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "userUuid": prof_uuid,
            "role": 3
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "courses.listForUser",
        json!({ "sessionToken": prof_token }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "6a",
        "auth.me",
        json!({ "sessionToken": prof_token }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "pages.create",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "path": "/",
            "title": "Home",
            "content": "# Welcome",
            "visibility": 2
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "pages.view",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "path": "/"
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "pages.edit",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "path": "/",
            "title": "Home",
            "content": "# Welcome back",
            "visibility": 2
        }),
    );

    let started = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "attendance.start",
        json!({ "sessionToken": prof_token, "courseUrl": "/cpsc-408-f24" }),
    );
    let session_id = started
        .get("sessionId")
        .and_then(|v| v.as_i64())
        .expect("sessionId");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "attendance.listSessions",
        json!({ "sessionToken": prof_token, "courseUrl": "/cpsc-408-f24" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "12",
        "attendance.records",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "sessionId": session_id
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "13",
        "attendance.close",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "sessionId": session_id
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "14",
        "attendance.delete",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "sessionId": session_id
        }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "15",
        "pages.delete",
        json!({
            "sessionToken": prof_token,
            "courseUrl": "/cpsc-408-f24",
            "path": "/"
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "16",
        "auth.signOut",
        json!({ "sessionToken": prof_token }),
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
