//! Derived views over the canonical list.
//!
//! Everything here is a pure function of its inputs: no state, no storage,
//! and the input list is never modified.

use crate::types::TodoItem;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::str::FromStr;
use thiserror::Error;

/// Errors parsing query parameters from strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseQueryError {
    /// Not one of `all`, `active`, `completed`
    #[error("unknown visibility '{0}' (expected all, active or completed)")]
    UnknownVisibility(String),

    /// Not one of `ascending`, `descending`
    #[error("unknown sort order '{0}' (expected ascending or descending)")]
    UnknownSortOrder(String),
}

/// Which items a view shows, by completion state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
}

impl Visibility {
    /// Whether `item` passes this filter
    #[must_use]
    pub const fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    /// Lowercase name, as used in configuration and serialized views
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseQueryError::UnknownVisibility(s.to_string())),
        }
    }
}

/// Display order by id
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Ascending,
    /// Newest first
    Descending,
}

impl SortOrder {
    /// Lowercase name, as used in configuration and serialized views
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The other direction
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(ParseQueryError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// Derive the visible list
///
/// 1. keep items matching `visibility`
/// 2. stable-sort by id in `sort` order
/// 3. if `search` is non-empty, keep items whose text contains it,
///    ignoring case
///
/// # Example
///
/// ```
/// use todo::query::{visible, SortOrder, Visibility};
/// use todo::{TodoId, TodoItem};
///
/// let list = vec![
///     TodoItem::new(TodoId::new(1), "Buy Milk"),
///     TodoItem::new(TodoId::new(2), "Write spec"),
/// ];
/// let view = visible(&list, Visibility::All, SortOrder::Descending, "milk");
/// assert_eq!(view.len(), 1);
/// assert_eq!(view[0].text, "Buy Milk");
/// ```
#[must_use]
pub fn visible(
    list: &[TodoItem],
    visibility: Visibility,
    sort: SortOrder,
    search: &str,
) -> Vec<TodoItem> {
    let mut items: Vec<TodoItem> = list
        .iter()
        .filter(|item| visibility.matches(item))
        .cloned()
        .collect();

    match sort {
        SortOrder::Ascending => items.sort_by_key(|item| item.id),
        SortOrder::Descending => items.sort_by_key(|item| Reverse(item.id)),
    }

    if !search.is_empty() {
        let needle = search.to_lowercase();
        items.retain(|item| item.text.to_lowercase().contains(&needle));
    }

    items
}

/// Number of items not yet completed
#[must_use]
pub fn remaining_count(list: &[TodoItem]) -> usize {
    list.iter().filter(|item| !item.completed).count()
}

/// Number of completed items
#[must_use]
pub fn completed_count(list: &[TodoItem]) -> usize {
    list.len() - remaining_count(list)
}

/// True when the list is non-empty and every item is completed
#[must_use]
pub fn is_all_completed(list: &[TodoItem]) -> bool {
    !list.is_empty() && remaining_count(list) == 0
}

/// True when "clear completed" would remove something
#[must_use]
pub fn has_completed(list: &[TodoItem]) -> bool {
    list.iter().any(|item| item.completed)
}

/// Footer label for the number of remaining items, e.g. `"3 items left"`
#[must_use]
pub fn items_left_label(remaining: usize) -> String {
    if remaining == 1 {
        "1 item left".to_string()
    } else {
        format!("{remaining} items left")
    }
}

/// The three view parameters bundled together
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoQuery {
    /// Completion filter
    pub visibility: Visibility,
    /// Order by id
    pub sort: SortOrder,
    /// Case-insensitive substring filter; empty shows everything
    pub search: String,
}

impl TodoQuery {
    /// Query with the given sort order and no filtering
    #[must_use]
    pub const fn sorted(sort: SortOrder) -> Self {
        Self {
            visibility: Visibility::All,
            sort,
            search: String::new(),
        }
    }

    /// Apply this query to a list
    #[must_use]
    pub fn apply(&self, list: &[TodoItem]) -> Vec<TodoItem> {
        visible(list, self.visibility, self.sort, &self.search)
    }
}
