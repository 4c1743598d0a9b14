use rusqlite::Connection;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Per-process context: the open store connection, constructed once at
/// startup and passed explicitly to every handler.
pub struct AppState {
    pub db_path: PathBuf,
    pub conn: Connection,
}
