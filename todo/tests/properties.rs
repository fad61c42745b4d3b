//! Property-based tests for the todo store and derived views
//!
//! Uses proptest to drive random operation sequences and random lists, and
//! checks that the list invariants hold for all of them.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use composable_todo_testing::{test_clock, MemoryStorage};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use todo::query::{self, SortOrder, Visibility};
use todo::{TodoEnvironment, TodoId, TodoItem, TodoStore};

#[derive(Clone, Debug)]
enum Op {
    Add(String),
    SetCompleted(usize, bool),
    Toggle(usize),
    SetText(usize, String),
    Remove(usize),
    ClearCompleted,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[ a-zA-Z]{0,12}".prop_map(Op::Add),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(i, c)| Op::SetCompleted(i, c)),
        1 => any::<usize>().prop_map(Op::Toggle),
        1 => (any::<usize>(), "[ a-z]{0,8}").prop_map(|(i, t)| Op::SetText(i, t)),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::ClearCompleted),
    ]
}

fn list_strategy() -> impl Strategy<Value = Vec<TodoItem>> {
    prop::collection::vec((0u64..1_000, "[a-zA-Z ]{0,10}", any::<bool>()), 0..30).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(id, text, completed)| TodoItem {
                    id: TodoId::new(id),
                    text,
                    completed,
                })
                .collect()
        },
    )
}

fn open(storage: &Arc<MemoryStorage>) -> TodoStore {
    // A frozen clock is the worst case for id generation
    TodoStore::open(TodoEnvironment::new(
        Arc::new(test_clock()),
        storage.clone(),
        "next-todo-list",
    ))
}

/// Pick an existing id by index, or an id that is certainly absent
fn pick(store: &TodoStore, index: usize) -> TodoId {
    let list = store.snapshot();
    if list.is_empty() || index % 5 == 0 {
        return TodoId::new(u64::from(u32::MAX));
    }
    list[index % list.len()].id
}

fn apply(store: &mut TodoStore, op: Op) {
    match op {
        Op::Add(text) => {
            store.add(text).unwrap();
        },
        Op::SetCompleted(i, completed) => {
            let id = pick(store, i);
            store.set_completed(id, completed).unwrap();
        },
        Op::Toggle(i) => {
            let id = pick(store, i);
            store.toggle(id).unwrap();
        },
        Op::SetText(i, text) => {
            let id = pick(store, i);
            store.set_text(id, text).unwrap();
        },
        Op::Remove(i) => {
            let id = pick(store, i);
            store.remove(id).unwrap();
        },
        Op::ClearCompleted => store.clear_completed().unwrap(),
    }
}

proptest! {
    #[test]
    fn ids_stay_distinct(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = open(&storage);
        for op in ops {
            apply(&mut store, op);
        }

        let list = store.snapshot();
        let ids: HashSet<TodoId> = list.iter().map(|item| item.id).collect();
        prop_assert_eq!(ids.len(), list.len());
    }

    #[test]
    fn load_matches_snapshot(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = open(&storage);
        for op in ops {
            apply(&mut store, op);
        }

        // Nothing written yet means nothing to load
        if storage.write_count() > 0 {
            prop_assert_eq!(store.load(), store.snapshot());
        } else {
            prop_assert!(store.load().is_empty());
        }
        prop_assert_eq!(open(&storage).snapshot(), store.load());
    }

    #[test]
    fn texts_are_trimmed_and_non_empty(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = open(&storage);
        for op in ops {
            apply(&mut store, op);
        }

        for item in store.snapshot().iter() {
            prop_assert!(!item.text.is_empty());
            prop_assert_eq!(item.text.trim(), item.text.as_str());
        }
    }

    #[test]
    fn set_completed_is_idempotent(
        texts in prop::collection::vec("[a-z]{1,6}", 1..10),
        index in any::<usize>(),
        completed in any::<bool>(),
    ) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = open(&storage);
        for text in texts {
            store.add(text).unwrap();
        }
        let id = store.snapshot()[index % store.snapshot().len()].id;

        store.set_completed(id, completed).unwrap();
        let once = store.snapshot();
        store.set_completed(id, completed).unwrap();
        prop_assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn visibility_filters_by_completion(list in list_strategy()) {
        for item in query::visible(&list, Visibility::Active, SortOrder::Ascending, "") {
            prop_assert!(!item.completed);
        }
        for item in query::visible(&list, Visibility::Completed, SortOrder::Ascending, "") {
            prop_assert!(item.completed);
        }

        let active = query::visible(&list, Visibility::Active, SortOrder::Ascending, "").len();
        let completed = query::visible(&list, Visibility::Completed, SortOrder::Ascending, "").len();
        prop_assert_eq!(active + completed, list.len());
        prop_assert_eq!(active, query::remaining_count(&list));
    }

    #[test]
    fn sort_orders_ids(list in list_strategy()) {
        let ascending = query::visible(&list, Visibility::All, SortOrder::Ascending, "");
        let descending = query::visible(&list, Visibility::All, SortOrder::Descending, "");

        prop_assert!(ascending.windows(2).all(|w| w[0].id <= w[1].id));
        prop_assert!(descending.windows(2).all(|w| w[0].id >= w[1].id));
        prop_assert_eq!(ascending.len(), list.len());
    }

    #[test]
    fn sort_is_strict_for_distinct_ids(
        ids in prop::collection::hash_set(0u64..10_000, 0..30),
    ) {
        let list: Vec<TodoItem> = ids
            .into_iter()
            .map(|id| TodoItem::new(TodoId::new(id), "x"))
            .collect();

        let ascending = query::visible(&list, Visibility::All, SortOrder::Ascending, "");
        let descending = query::visible(&list, Visibility::All, SortOrder::Descending, "");
        prop_assert!(ascending.windows(2).all(|w| w[0].id < w[1].id));
        prop_assert!(descending.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn search_matches_regardless_of_case(list in list_strategy(), needle in "[a-zA-Z]{1,3}") {
        let lower = query::visible(&list, Visibility::All, SortOrder::Ascending, &needle.to_lowercase());
        let upper = query::visible(&list, Visibility::All, SortOrder::Ascending, &needle.to_uppercase());
        prop_assert_eq!(&lower, &upper);
        for item in &lower {
            prop_assert!(item.text.to_lowercase().contains(&needle.to_lowercase()));
        }
    }

    #[test]
    fn views_never_touch_the_input(list in list_strategy(), search in "[a-z]{0,2}") {
        let before = list.clone();
        let _ = query::visible(&list, Visibility::Active, SortOrder::Descending, &search);
        prop_assert_eq!(list, before);
    }
}
