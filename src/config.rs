use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings loaded from the environment at startup. A `.env` file is
/// honored for local development, skipped under test to keep tests hermetic.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let database_path = std::env::var("COURSEBOOKD_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("coursebook.sqlite3"));
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "COURSEBOOKD_DB_PATH".to_string(),
                "path must not be empty".to_string(),
            ));
        }

        let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_path,
            log_filter,
        })
    }
}
