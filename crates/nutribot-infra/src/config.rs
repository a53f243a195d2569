//! Data directory and database URL resolution.
//!
//! The service keeps its SQLite database under a single data directory,
//! resolved from `NUTRIBOT_DATA_DIR` with a `~/.nutribot` fallback.

use std::path::PathBuf;

/// Resolve the data directory.
///
/// Priority: explicit override, then `NUTRIBOT_DATA_DIR`, then
/// `$HOME/.nutribot`, then `./.nutribot` as a last resort.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    if let Ok(dir) = std::env::var("NUTRIBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".nutribot")
}

/// Build the sqlite connection URL for a database file inside `data_dir`.
pub fn database_url(data_dir: &std::path::Path) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir.join("nutribot.db").display()
    )
}
