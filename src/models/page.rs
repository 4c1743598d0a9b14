use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilitySetting {
    Hidden = 0,
    Unlisted = 1,
    Listed = 2,
}

impl VisibilitySetting {
    pub fn from_i64(v: i64) -> Option<VisibilitySetting> {
        match v {
            0 => Some(VisibilitySetting::Hidden),
            1 => Some(VisibilitySetting::Unlisted),
            2 => Some(VisibilitySetting::Listed),
            _ => None,
        }
    }

    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

/// A static course page. Pages form an implicit tree by path segmentation;
/// there is no parent pointer, ancestry is inferred from path prefixes.
#[derive(Debug, Clone)]
pub struct Page {
    pub page_id: Option<i64>,
    pub course_id: i64,
    pub url_path_after_course_path: String,
    pub title: String,
    pub content: String,
    pub visibility: VisibilitySetting,
    pub created_by_user_id: Option<i64>,
}

impl Page {
    /// The only way a path enters the system: construction fails with
    /// `InvalidPath` before any SQL runs.
    pub fn new(
        course_id: i64,
        url_path_after_course_path: String,
        title: String,
        content: String,
        visibility: VisibilitySetting,
        created_by_user_id: Option<i64>,
    ) -> DomainResult<Page> {
        validate_url_path(&url_path_after_course_path)?;
        Ok(Page {
            page_id: None,
            course_id,
            url_path_after_course_path,
            title,
            content,
            visibility,
            created_by_user_id,
        })
    }
}

/// Path rules: leading slash, no trailing slash (the literal root `/`
/// excepted), and no reserved route segments (`/attendance` and `/new`
/// prefixes, `/edit` anywhere).
pub fn validate_url_path(path: &str) -> DomainResult<()> {
    if !path.starts_with('/') {
        return Err(DomainError::InvalidPath("path must start with /"));
    }
    if path != "/" && path.ends_with('/') {
        return Err(DomainError::InvalidPath("path must not end with /"));
    }
    if path.starts_with("/attendance") || path.starts_with("/new") {
        return Err(DomainError::InvalidPath(
            "path must not start with a reserved segment",
        ));
    }
    if path.contains("/edit") {
        return Err(DomainError::InvalidPath("path must not contain /edit"));
    }
    Ok(())
}

/// One node of the sidebar navigation forest.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNavigationLink {
    pub title: String,
    pub url_path_after_course_path: String,
    pub nested_links: Vec<PageNavigationLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_page(path: &str) -> DomainResult<Page> {
        Page::new(
            1,
            path.to_string(),
            "Test Title".to_string(),
            "Test Content".to_string(),
            VisibilitySetting::Listed,
            None,
        )
    }

    #[test]
    fn accepts_valid_paths() {
        for path in ["/", "/valid-path", "/syllabus/grading"] {
            assert!(try_page(path).is_ok(), "expected {} to be valid", path);
        }
    }

    #[test]
    fn rejects_path_without_leading_slash() {
        assert!(matches!(
            try_page("no-slash"),
            Err(DomainError::InvalidPath(_))
        ));
    }

    #[test]
    fn rejects_trailing_slash() {
        assert!(matches!(
            try_page("/invalid-path/"),
            Err(DomainError::InvalidPath(_))
        ));
    }

    #[test]
    fn rejects_reserved_segments() {
        for path in ["/attendance", "/attendance/today", "/new", "/foo/edit/bar"] {
            assert!(
                matches!(try_page(path), Err(DomainError::InvalidPath(_))),
                "expected {} to be rejected",
                path
            );
        }
    }
}
