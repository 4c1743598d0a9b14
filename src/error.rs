use rusqlite::ffi;

/// Outcome taxonomy of the store layer. Constraint violations are translated
/// from SQLite extended result codes exactly once, here; everything above the
/// store matches on these variants instead of inspecting engine errors.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("entry already exists")]
    AlreadyExists,
    #[error("entry not found")]
    NotFound,
    #[error("entry still has dependent rows")]
    Dependency,
    #[error("invalid page path: {0}")]
    InvalidPath(&'static str),
    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(cause, _) = &e {
            match cause.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return DomainError::AlreadyExists;
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return DomainError::Dependency,
                _ => {}
            }
        }
        DomainError::Sqlite(e)
    }
}
