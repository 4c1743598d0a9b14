use crate::error::{DomainError, DomainResult};
use crate::models::{Page, VisibilitySetting};
use rusqlite::{Connection, OptionalExtension, Row};

// Single decode boundary for page rows; visibility is validated here and
// nowhere else.
fn page_from_row(r: &Row) -> rusqlite::Result<Page> {
    let raw_visibility: i64 = r.get(5)?;
    let visibility = VisibilitySetting::from_i64(raw_visibility)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(5, raw_visibility))?;
    Ok(Page {
        page_id: Some(r.get(0)?),
        course_id: r.get(1)?,
        url_path_after_course_path: r.get(2)?,
        title: r.get(3)?,
        content: r.get(4)?,
        visibility,
        created_by_user_id: r.get(6)?,
    })
}

pub fn insert_page(conn: &Connection, page: &Page) -> DomainResult<i64> {
    if page.page_id.is_some() {
        return Err(DomainError::AlreadyExists);
    }
    conn.execute(
        "INSERT INTO pages(
            course_id,
            url_path_after_course_path,
            title,
            content,
            visibility,
            created_by_user_id
         )
         VALUES(?, ?, ?, ?, ?, ?)",
        (
            page.course_id,
            &page.url_path_after_course_path,
            &page.title,
            &page.content,
            page.visibility.as_i64(),
            page.created_by_user_id,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_page(conn: &Connection, page: &Page) -> DomainResult<()> {
    let Some(page_id) = page.page_id else {
        return Err(DomainError::NotFound);
    };
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pages WHERE page_id = ?",
        [page_id],
        |r| r.get(0),
    )?;
    if count < 1 {
        return Err(DomainError::NotFound);
    }
    conn.execute(
        "UPDATE pages
         SET url_path_after_course_path = ?,
             title = ?,
             content = ?,
             visibility = ?,
             course_id = ?,
             created_by_user_id = ?
         WHERE page_id = ?",
        (
            &page.url_path_after_course_path,
            &page.title,
            &page.content,
            page.visibility.as_i64(),
            page.course_id,
            page.created_by_user_id,
            page_id,
        ),
    )?;
    Ok(())
}

pub fn delete_page(conn: &Connection, page_id: i64) -> DomainResult<()> {
    let affected = conn.execute("DELETE FROM pages WHERE page_id = ?", [page_id])?;
    if affected < 1 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}

pub fn find_by_course_and_path(
    conn: &Connection,
    course_id: i64,
    url_path: &str,
) -> DomainResult<Option<Page>> {
    let page = conn
        .query_row(
            "SELECT
                page_id,
                course_id,
                url_path_after_course_path,
                title,
                content,
                visibility,
                created_by_user_id
             FROM pages
             WHERE course_id = ? AND url_path_after_course_path = ?",
            (course_id, url_path),
            page_from_row,
        )
        .optional()?;
    Ok(page)
}
