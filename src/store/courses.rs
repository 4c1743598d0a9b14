use crate::error::{DomainError, DomainResult};
use crate::models::{Course, CourseTerm, CourseTermWithCourses};
use rusqlite::{Connection, OptionalExtension, Row};

fn course_from_row(r: &Row) -> rusqlite::Result<Course> {
    Ok(Course {
        course_id: Some(r.get(0)?),
        title: r.get(1)?,
        class_code: r.get(2)?,
        starting_url_path: r.get(3)?,
        course_term_id: r.get(4)?,
    })
}

pub fn insert_course(conn: &Connection, course: &Course) -> DomainResult<i64> {
    if course.course_id.is_some() {
        return Err(DomainError::AlreadyExists);
    }
    conn.execute(
        "INSERT INTO courses(title, class_code, starting_url_path, course_term_id)
         VALUES(?, ?, ?, ?)",
        (
            &course.title,
            &course.class_code,
            &course.starting_url_path,
            course.course_term_id,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_metadata(conn: &Connection, course: &Course) -> DomainResult<()> {
    let Some(course_id) = course.course_id else {
        return Err(DomainError::NotFound);
    };
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM courses WHERE course_id = ?",
        [course_id],
        |r| r.get(0),
    )?;
    if count < 1 {
        return Err(DomainError::NotFound);
    }
    conn.execute(
        "UPDATE courses
         SET title = ?, class_code = ?, starting_url_path = ?, course_term_id = ?
         WHERE course_id = ?",
        (
            &course.title,
            &course.class_code,
            &course.starting_url_path,
            course.course_term_id,
            course_id,
        ),
    )?;
    Ok(())
}

/// No cascade: a course that still has enrollments, pages, or attendance
/// sessions fails with `Dependency`.
pub fn delete_course(conn: &Connection, course_id: i64) -> DomainResult<()> {
    let affected = conn.execute("DELETE FROM courses WHERE course_id = ?", [course_id])?;
    if affected < 1 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}

pub fn find_by_starting_url(conn: &Connection, url: &str) -> DomainResult<Option<Course>> {
    let course = conn
        .query_row(
            "SELECT course_id, title, class_code, starting_url_path, course_term_id
             FROM courses
             WHERE starting_url_path = ?",
            [url],
            course_from_row,
        )
        .optional()?;
    Ok(course)
}

/// The signed-in user's course list, grouped by term, terms ordered by
/// position and courses by class code. Courses without a term are not shown
/// on the list.
pub fn terms_with_courses_for_user(
    conn: &Connection,
    user_id: i64,
) -> DomainResult<Vec<CourseTermWithCourses>> {
    let mut stmt = conn.prepare(
        "SELECT
            t.course_term_id,
            t.title,
            t.position_from_top,
            c.course_id,
            c.title,
            c.class_code,
            c.starting_url_path
         FROM courses c
         JOIN course_terms t ON t.course_term_id = c.course_term_id
         JOIN enrollments e ON e.course_id = c.course_id
         WHERE e.user_id = ?
         ORDER BY t.position_from_top ASC, c.class_code ASC",
    )?;
    let rows = stmt
        .query_map([user_id], |r| {
            let term = CourseTerm {
                course_term_id: r.get(0)?,
                title: r.get(1)?,
                position_from_top: r.get(2)?,
            };
            let course = Course {
                course_id: Some(r.get(3)?),
                title: r.get(4)?,
                class_code: r.get(5)?,
                starting_url_path: r.get(6)?,
                course_term_id: Some(term.course_term_id),
            };
            Ok((term, course))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    // Rows arrive sorted by term, so grouping is a contiguity check.
    let mut terms: Vec<CourseTermWithCourses> = Vec::new();
    for (term, course) in rows {
        match terms.last_mut() {
            Some(last) if last.term.course_term_id == term.course_term_id => {
                last.courses.push(course);
            }
            _ => terms.push(CourseTermWithCourses {
                term,
                courses: vec![course],
            }),
        }
    }
    Ok(terms)
}
