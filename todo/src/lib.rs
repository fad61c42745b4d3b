//! Todo list engine built on the composable reducer runtime.
//!
//! A single canonical list of short text items that can be added, edited,
//! completed and deleted, persisted to an injected key-value storage after
//! every change, and shown through pure derived views.
//!
//! - [`TodoStore`] owns the canonical list and is the only way to change it
//! - [`query`] derives what a view shows: filter, sort by id, search
//! - [`view`] holds UI-side query and edit state
//! - [`persistence`] reads and writes the stored layout
//!
//! # Quick Start
//!
//! ```
//! use composable_todo_core::environment::SystemClock;
//! use composable_todo_testing::MemoryStorage;
//! use std::sync::Arc;
//! use todo::query::{self, SortOrder, Visibility};
//! use todo::{TodoEnvironment, TodoStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(
//!     Arc::new(SystemClock),
//!     Arc::new(MemoryStorage::new()),
//!     "next-todo-list",
//! );
//! let mut store = TodoStore::open(env);
//!
//! let milk = store.add("Buy milk")?.ok_or("empty text")?;
//! store.add("Write documentation")?;
//! store.set_completed(milk.id, true)?;
//!
//! let list = store.snapshot();
//! let active = query::visible(&list, Visibility::Active, SortOrder::Ascending, "");
//! assert_eq!(active.len(), 1);
//! println!("{}", query::items_left_label(query::remaining_count(&list)));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod persistence;
pub mod query;
pub mod reducer;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::TodoConfig;
pub use query::{SortOrder, TodoQuery, Visibility};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use storage::FileStorage;
pub use store::TodoStore;
pub use types::{TodoAction, TodoId, TodoItem, TodoList, TodoState};
pub use view::{ViewAction, ViewReducer, ViewState};
