//! Configuration management for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to their default.

use crate::persistence::StorageFormat;
use crate::query::SortOrder;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Storage key the list has always been written under
pub const DEFAULT_STORAGE_KEY: &str = "next-todo-list";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Key the list is stored under (default: `next-todo-list`)
    pub storage_key: String,
    /// Layout used for writes: legacy or versioned (default: legacy)
    pub storage_format: StorageFormat,
    /// File backing the demo's key-value storage (default: `todos.json`)
    pub data_file: PathBuf,
    /// Initial sort order of the list view (default: ascending)
    pub default_sort: SortOrder,
    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl TodoConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            storage_key: lookup("TODO_STORAGE_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            storage_format: lookup("TODO_STORAGE_FORMAT")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            data_file: lookup("TODO_DATA_FILE")
                .map_or_else(|| PathBuf::from("todos.json"), PathBuf::from),
            default_sort: lookup("TODO_DEFAULT_SORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}
