//! Encoding of the todo list under its storage key.
//!
//! The stored value is a JSON array of items, the layout the list has always
//! been written in. A versioned envelope `{"version": 1, "items": [...]}` is
//! also understood, and written when [`StorageFormat::Versioned`] is
//! configured.
//!
//! Loading never fails: a missing key, an unreadable store or malformed data
//! all degrade to an empty list with a warning.

use crate::reducer;
use crate::types::{TodoId, TodoItem, TodoList};
use composable_todo_core::storage::KeyValueStorage;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

/// Envelope version written by [`StorageFormat::Versioned`]
pub const CURRENT_VERSION: u32 = 1;

/// Which layout new writes use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// Bare JSON array
    #[default]
    Legacy,
    /// `{"version": 1, "items": [...]}`
    Versioned,
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Versioned => f.write_str("versioned"),
        }
    }
}

impl FromStr for StorageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "versioned" => Ok(Self::Versioned),
            other => Err(format!("unknown storage format '{other}'")),
        }
    }
}

/// Why a stored value could not be turned into a list
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Not JSON, or not shaped like a list of items
    #[error("malformed todo list: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Envelope written by a newer version
    #[error("unsupported todo list version {0}")]
    UnsupportedVersion(u32),
}

/// Stored representation of the list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Bare array of items
    Legacy(TodoList),
    /// Array wrapped with a version number
    Versioned {
        /// Envelope version
        version: u32,
        /// The list
        items: TodoList,
    },
}

impl Payload {
    /// Wrap `items` for writing in the given format
    #[must_use]
    pub fn new(items: TodoList, format: StorageFormat) -> Self {
        match format {
            StorageFormat::Legacy => Self::Legacy(items),
            StorageFormat::Versioned => Self::Versioned {
                version: CURRENT_VERSION,
                items,
            },
        }
    }

    /// Unwrap the list, rejecting envelope versions this build cannot read
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedVersion`] for an unknown version.
    pub fn into_items(self) -> Result<TodoList, DecodeError> {
        match self {
            Self::Legacy(items) => Ok(items),
            Self::Versioned { version, items } if version == CURRENT_VERSION => Ok(items),
            Self::Versioned { version, .. } => Err(DecodeError::UnsupportedVersion(version)),
        }
    }
}

/// Encode a list in the given format
///
/// # Errors
///
/// Returns the serializer error; with the item types used here this does
/// not happen in practice.
pub fn encode(items: &TodoList, format: StorageFormat) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Payload::new(items.clone(), format))
}

/// Decode a stored value in either layout
///
/// # Errors
///
/// Returns [`DecodeError`] if the value is not a list of items.
pub fn decode(raw: &str) -> Result<TodoList, DecodeError> {
    let payload: Payload = serde_json::from_str(raw)?;
    payload.into_items()
}

/// Give every item after the first holder of an id a fresh id
///
/// Fresh ids are allocated above the largest id in the list, so order and
/// data are preserved. Once that runs past `u64::MAX` the smallest unused id
/// is taken instead. Returns the input snapshot untouched when all ids are
/// already distinct.
#[must_use]
pub fn repair_duplicate_ids(list: TodoList) -> TodoList {
    let mut seen = HashSet::with_capacity(list.len());
    if list.iter().all(|item| seen.insert(item.id)) {
        return list;
    }

    let mut used: HashSet<u64> = list.iter().map(|item| item.id.get()).collect();
    let mut next = list.max_id().map_or(0, TodoId::get);
    let mut seen = HashSet::with_capacity(list.len());
    list.iter()
        .map(|item| {
            if seen.insert(item.id) {
                return item.clone();
            }
            let replacement = match next.checked_add(1) {
                Some(above) => {
                    next = above;
                    above
                },
                None => reducer::lowest_unused_id(&used),
            };
            used.insert(replacement);
            tracing::warn!(duplicate = %item.id, replacement, "Reassigning duplicate todo id");
            TodoItem {
                id: TodoId::new(replacement),
                ..item.clone()
            }
        })
        .collect()
}

/// Read the list stored under `key`
///
/// Absent keys, storage failures and malformed values all yield an empty
/// list. Duplicate ids are repaired.
pub fn load_list(storage: &dyn KeyValueStorage, key: &str) -> TodoList {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No stored todo list, starting empty");
            return TodoList::new();
        },
        Err(error) => {
            tracing::warn!(key, error = %error, "Failed to read todo list, starting empty");
            return TodoList::new();
        },
    };

    match decode(&raw) {
        Ok(items) => repair_duplicate_ids(items),
        Err(error) => {
            tracing::warn!(key, error = %error, "Ignoring unreadable todo list");
            TodoList::new()
        },
    }
}
