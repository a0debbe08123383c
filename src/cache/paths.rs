// Cache path utilities.
// Resolves where the response cache and log file live on disk.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/reposcout on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "reposcout").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the persisted search response cache.
pub fn search_cache_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("search_cache.json"))
}

/// Path to the log file written while the TUI owns the terminal.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("reposcout.log"))
}
