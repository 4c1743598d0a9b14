/// A course offering. `starting_url_path` (e.g. `/cpsc-408-f24`) is globally
/// unique and prefixes every page route of the course.
#[derive(Debug, Clone)]
pub struct Course {
    pub course_id: Option<i64>,
    pub title: String,
    pub class_code: String,
    pub starting_url_path: String,
    pub course_term_id: Option<i64>,
}

/// Organizational grouping shown on a user's course list.
#[derive(Debug, Clone)]
pub struct CourseTerm {
    pub course_term_id: i64,
    pub title: String,
    pub position_from_top: i64,
}

#[derive(Debug, Clone)]
pub struct CourseTermWithCourses {
    pub term: CourseTerm,
    pub courses: Vec<Course>,
}
