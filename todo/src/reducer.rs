//! Reducer logic for the todo list.
//!
//! Every mutation rebuilds the list, replaces the snapshot in state and
//! returns a single persist effect. Actions that would change nothing return
//! no effects at all, so nothing is written.

use crate::config::TodoConfig;
use crate::persistence::{self, StorageFormat};
use crate::types::{TodoAction, TodoId, TodoItem, TodoList, TodoState};
use chrono::{DateTime, Utc};
use composable_todo_core::{
    effect::Effect,
    environment::{Clock, SystemClock},
    persist,
    reducer::Reducer,
    smallvec,
    storage::KeyValueStorage,
    SmallVec,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating ids
    pub clock: Arc<dyn Clock>,
    /// Where the list is persisted
    pub storage: Arc<dyn KeyValueStorage>,
    /// Key the list is stored under
    pub storage_key: String,
    /// Layout used for writes
    pub format: StorageFormat,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment` writing the legacy layout
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        storage: Arc<dyn KeyValueStorage>,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            clock,
            storage,
            storage_key: storage_key.into(),
            format: StorageFormat::default(),
        }
    }

    /// Use the given layout for writes
    #[must_use]
    pub const fn with_format(mut self, format: StorageFormat) -> Self {
        self.format = format;
        self
    }

    /// Production environment: system clock plus the configured key and format
    #[must_use]
    pub fn from_config(config: &TodoConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::new(Arc::new(SystemClock), storage, config.storage_key.clone())
            .with_format(config.storage_format)
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("storage_key", &self.storage_key)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Pick an id for a new item
///
/// Uses the clock's millisecond timestamp, bumped past the largest existing
/// id when the clock has not moved on. If that would overflow, the smallest
/// unused id is taken instead.
#[must_use]
pub fn next_id(items: &[TodoItem], now: DateTime<Utc>) -> TodoId {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let Some(max) = items.iter().map(|item| item.id.get()).max() else {
        return TodoId::new(millis);
    };

    match max.checked_add(1) {
        Some(above) => TodoId::new(millis.max(above)),
        None => {
            let used: HashSet<u64> = items.iter().map(|item| item.id.get()).collect();
            TodoId::new(lowest_unused_id(&used))
        },
    }
}

/// Smallest id not in `used`
pub(crate) fn lowest_unused_id(used: &HashSet<u64>) -> u64 {
    // A list cannot hold u64::MAX + 1 items, so a gap always exists.
    (0..=u64::MAX).find(|candidate| !used.contains(candidate)).unwrap_or(0)
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Install `items` and describe writing them back
    fn commit(
        state: &mut TodoState,
        items: TodoList,
        env: &TodoEnvironment,
    ) -> SmallVec<[Effect; 4]> {
        state.items = items;
        let snapshot = state.items.clone();
        let format = env.format;
        smallvec![persist! {
            storage: env.storage,
            key: env.storage_key,
            encode: move || persistence::encode(&snapshot, format)
        }]
    }

    /// Rebuild the list with `update` applied to the item with `id`
    fn update_item(
        items: &TodoList,
        id: TodoId,
        update: impl Fn(&TodoItem) -> TodoItem,
    ) -> TodoList {
        items
            .iter()
            .map(|item| if item.id == id { update(item) } else { item.clone() })
            .collect()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect; 4]> {
        match action {
            TodoAction::Add { text } => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("Ignoring add with empty text");
                    return SmallVec::new();
                }

                let id = next_id(&state.items, env.clock.now());
                let items: TodoList = state
                    .items
                    .iter()
                    .cloned()
                    .chain(std::iter::once(TodoItem::new(id, text)))
                    .collect();
                Self::commit(state, items, env)
            },

            TodoAction::SetCompleted { id, completed } => {
                if !state.items.contains(id) {
                    tracing::debug!(%id, "Ignoring completion change for unknown todo");
                    return SmallVec::new();
                }

                let items = Self::update_item(&state.items, id, |item| TodoItem {
                    completed,
                    ..item.clone()
                });
                Self::commit(state, items, env)
            },

            TodoAction::SetText { id, text } => {
                if !state.items.contains(id) {
                    tracing::debug!(%id, "Ignoring edit of unknown todo");
                    return SmallVec::new();
                }
                let text = text.trim();
                if text.is_empty() {
                    tracing::warn!(%id, "Rejecting edit that would leave the todo empty");
                    return SmallVec::new();
                }

                let items = Self::update_item(&state.items, id, |item| TodoItem {
                    text: text.to_string(),
                    ..item.clone()
                });
                Self::commit(state, items, env)
            },

            TodoAction::Remove { id } => {
                if !state.items.contains(id) {
                    tracing::debug!(%id, "Ignoring removal of unknown todo");
                    return SmallVec::new();
                }

                let items = state.items.iter().filter(|item| item.id != id).cloned().collect();
                Self::commit(state, items, env)
            },

            TodoAction::ClearCompleted => {
                if !state.items.iter().any(|item| item.completed) {
                    return SmallVec::new();
                }

                let items = state.items.iter().filter(|item| !item.completed).cloned().collect();
                Self::commit(state, items, env)
            },

            TodoAction::Replace { items } => {
                state.items = persistence::repair_duplicate_ids(items);
                SmallVec::new()
            },
        }
    }
}
