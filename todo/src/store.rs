//! The todo store: owner of the canonical list.
//!
//! `TodoStore` is a thin typed facade over the runtime [`Store`]. Every
//! method builds a [`TodoAction`] and sends it through [`TodoStore::dispatch`],
//! so the reducer stays the only place the list changes.

use crate::persistence;
use crate::query;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoId, TodoItem, TodoList, TodoState};
use composable_todo_runtime::{Store, StoreError, SubscriptionId};

/// Single-writer owner of the todo list
pub struct TodoStore {
    inner: Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>,
}

impl TodoStore {
    /// Open the store, loading whatever list is persisted
    ///
    /// A missing or unreadable list starts the store empty.
    #[must_use]
    pub fn open(env: TodoEnvironment) -> Self {
        let items = persistence::load_list(env.storage.as_ref(), &env.storage_key);
        tracing::info!(key = %env.storage_key, items = items.len(), "Opened todo store");
        Self {
            inner: Store::new(TodoState::new(items), TodoReducer::new(), env),
        }
    }

    /// Apply an action
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the list could not be written. The
    /// in-memory list keeps the change either way.
    pub fn dispatch(&mut self, action: TodoAction) -> Result<(), StoreError> {
        self.inner.send(action)
    }

    /// Append an item with the given text
    ///
    /// Returns the new item, or `None` if the trimmed text was empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the list could not be written.
    pub fn add(&mut self, text: impl Into<String>) -> Result<Option<TodoItem>, StoreError> {
        let before = self.snapshot();
        self.dispatch(TodoAction::Add { text: text.into() })?;
        let after = self.snapshot();
        if after.same_snapshot(&before) {
            return Ok(None);
        }
        Ok(after.last().cloned())
    }

    /// Mark an item completed or active; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the list could not be written.
    pub fn set_completed(&mut self, id: TodoId, completed: bool) -> Result<(), StoreError> {
        self.dispatch(TodoAction::SetCompleted { id, completed })
    }

    /// Flip the completion flag of an item; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the list could not be written.
    pub fn toggle(&mut self, id: TodoId) -> Result<(), StoreError> {
        let Some(completed) = self.inner.state(|s| s.items.get(id).map(|item| item.completed)) else {
            return Ok(());
        };
        self.set_completed(id, !completed)
    }

    /// Replace the text of an item; unknown ids and empty text are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the list could not be written.
    pub fn set_text(&mut self, id: TodoId, text: impl Into<String>) -> Result<(), StoreError> {
        self.dispatch(TodoAction::SetText {
            id,
            text: text.into(),
        })
    }

    /// Delete an item; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the list could not be written.
    pub fn remove(&mut self, id: TodoId) -> Result<(), StoreError> {
        self.dispatch(TodoAction::Remove { id })
    }

    /// Delete every completed item
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the list could not be written.
    pub fn clear_completed(&mut self) -> Result<(), StoreError> {
        self.dispatch(TodoAction::ClearCompleted)
    }

    /// The current list
    ///
    /// The snapshot is shared, not copied, and never changes afterwards.
    #[must_use]
    pub fn snapshot(&self) -> TodoList {
        self.inner.state(|s| s.items.clone())
    }

    /// Read the persisted list without touching the in-memory one
    #[must_use]
    pub fn load(&self) -> TodoList {
        let env = self.inner.environment();
        persistence::load_list(env.storage.as_ref(), &env.storage_key)
    }

    /// Replace the in-memory list with the persisted one
    ///
    /// # Errors
    ///
    /// Never fails in practice: installing a loaded list writes nothing.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let items = self.load();
        self.dispatch(TodoAction::Replace { items })
    }

    /// Number of items not yet completed
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.inner.state(|s| query::remaining_count(&s.items))
    }

    /// Register a listener called with each applied action and the list
    /// after it
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&TodoAction, &TodoList) + 'static,
    {
        self.inner
            .subscribe(move |action, state: &TodoState| listener(action, &state.items))
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("environment", self.inner.environment())
            .field("items", &self.snapshot().len())
            .finish()
    }
}
