//! UI-side view state: the active query and the item being edited.
//!
//! Kept apart from the canonical list. Driving it never touches storage, so
//! [`ViewReducer`] returns no effects.

use crate::query::{SortOrder, TodoQuery, Visibility};
use crate::types::{TodoId, TodoItem};
use composable_todo_core::{effect::Effect, reducer::Reducer, SmallVec};
use serde::{Deserialize, Serialize};

/// What the list view currently shows
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Filter, sort and search applied to the list
    pub query: TodoQuery,
    /// Item whose text is being edited, if any
    pub editing: Option<TodoId>,
}

impl ViewState {
    /// View showing everything in the given order
    #[must_use]
    pub const fn with_sort(sort: SortOrder) -> Self {
        Self {
            query: TodoQuery::sorted(sort),
            editing: None,
        }
    }

    /// The derived list for this view
    #[must_use]
    pub fn visible(&self, list: &[TodoItem]) -> Vec<TodoItem> {
        self.query.apply(list)
    }

    /// The item under edit, or `None` if nothing is being edited or the item
    /// has since been removed
    #[must_use]
    pub fn editing_item<'a>(&self, list: &'a [TodoItem]) -> Option<&'a TodoItem> {
        let id = self.editing?;
        list.iter().find(|item| item.id == id)
    }
}

/// Inputs that change the view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewAction {
    /// Switch the completion filter
    SetVisibility(Visibility),
    /// Switch the sort order
    SetSort(SortOrder),
    /// Replace the search text
    SetSearch(String),
    /// Start editing an item
    BeginEdit(TodoId),
    /// Leave edit mode
    FinishEdit,
}

/// Reducer for [`ViewState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewReducer;

impl Reducer for ViewReducer {
    type State = ViewState;
    type Action = ViewAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect; 4]> {
        match action {
            ViewAction::SetVisibility(visibility) => state.query.visibility = visibility,
            ViewAction::SetSort(sort) => state.query.sort = sort,
            ViewAction::SetSearch(search) => state.query.search = search,
            ViewAction::BeginEdit(id) => state.editing = Some(id),
            ViewAction::FinishEdit => state.editing = None,
        }
        SmallVec::new()
    }
}
