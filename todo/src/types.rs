//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of short text items that can be added,
//! edited, completed and deleted. The list is immutable once built: every
//! mutation produces a fresh [`TodoList`], so snapshots handed out earlier
//! never change underneath their holders.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

/// Unique identifier for a todo item
///
/// Ids are millisecond-timestamp shaped so that lists written by earlier
/// versions of the app stay readable, but uniqueness is enforced by the
/// reducer rather than trusted to the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// What needs to be done
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl TodoItem {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// The canonical list of todo items, in insertion order
///
/// Cloning is cheap and yields a handle to the same immutable snapshot.
/// Serializes as a plain JSON array of items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoList(Arc<[TodoItem]>);

impl Default for TodoList {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl TodoList {
    /// Creates an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the item with the given id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.0.iter().find(|item| item.id == id)
    }

    /// Checks if an item with the given id exists
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Largest id in the list
    #[must_use]
    pub fn max_id(&self) -> Option<TodoId> {
        self.0.iter().map(|item| item.id).max()
    }

    /// True if both handles point at the very same snapshot
    ///
    /// A mutation that changed nothing leaves the snapshot in place, so this
    /// doubles as cheap change detection.
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for TodoList {
    type Target = [TodoItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<TodoItem>> for TodoList {
    fn from(items: Vec<TodoItem>) -> Self {
        Self(items.into())
    }
}

impl FromIterator<TodoItem> for TodoList {
    fn from_iter<I: IntoIterator<Item = TodoItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for TodoList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for TodoList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<TodoItem>::deserialize(deserializer).map(Self::from)
    }
}

/// State owned by the todo store
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// The canonical list
    pub items: TodoList,
}

impl TodoState {
    /// Creates a state holding the given list
    #[must_use]
    pub const fn new(items: TodoList) -> Self {
        Self { items }
    }
}

/// Every mutation the todo list accepts
///
/// Each variant is handled by exactly one arm of the reducer, which keeps
/// the mutation surface exhaustive and testable without any UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TodoAction {
    /// Append a new item (ignored when the trimmed text is empty)
    Add {
        /// Text as typed; trimmed by the reducer
        text: String,
    },

    /// Set the completion flag of an item
    SetCompleted {
        /// Item to change
        id: TodoId,
        /// New completion state
        completed: bool,
    },

    /// Replace the text of an item (ignored when the trimmed text is empty)
    SetText {
        /// Item to change
        id: TodoId,
        /// Text as typed; trimmed by the reducer
        text: String,
    },

    /// Delete an item
    Remove {
        /// Item to delete
        id: TodoId,
    },

    /// Delete every completed item
    ClearCompleted,

    /// Install a list read from storage without writing it back
    Replace {
        /// The list to install
        items: TodoList,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, text: &str, completed: bool) -> TodoItem {
        TodoItem {
            id: TodoId::new(id),
            text: text.to_string(),
            completed,
        }
    }

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(1_700_000_000_000).to_string(), "1700000000000");
    }

    #[test]
    fn todo_item_new_is_active() {
        let item = TodoItem::new(TodoId::new(7), "Test todo");
        assert_eq!(item.id, TodoId::new(7));
        assert_eq!(item.text, "Test todo");
        assert!(!item.completed);
    }

    #[test]
    fn todo_item_json_shape() {
        let json = serde_json::to_string(&item(1, "Buy milk", true)).unwrap();
        assert_eq!(json, r#"{"id":1,"text":"Buy milk","completed":true}"#);
    }

    #[test]
    fn todo_list_lookup() {
        let list = TodoList::from(vec![item(1, "a", false), item(5, "b", true)]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(TodoId::new(5)).map(|i| i.text.as_str()), Some("b"));
        assert!(!list.contains(TodoId::new(2)));
        assert_eq!(list.max_id(), Some(TodoId::new(5)));
        assert_eq!(TodoList::new().max_id(), None);
    }

    #[test]
    fn todo_list_clones_share_snapshot() {
        let list = TodoList::from(vec![item(1, "a", false)]);
        let copy = list.clone();
        assert!(list.same_snapshot(&copy));

        let rebuilt: TodoList = list.iter().cloned().collect();
        assert_eq!(list, rebuilt);
        assert!(!list.same_snapshot(&rebuilt));
    }

    #[test]
    fn todo_list_serializes_as_array() {
        let list = TodoList::from(vec![item(1, "a", false)]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"[{"id":1,"text":"a","completed":false}]"#);
        let back: TodoList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn todo_action_is_tagged() {
        let action = TodoAction::SetCompleted {
            id: TodoId::new(3),
            completed: true,
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"set_completed","id":3,"completed":true}"#);
        assert_eq!(serde_json::from_str::<TodoAction>(&json).unwrap(), action);
    }
}
