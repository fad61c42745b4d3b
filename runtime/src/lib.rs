//! # Composable Todo Runtime
//!
//! Runtime implementation for the Composable Todo architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects
//! - **Effect Executor**: Runs effect descriptions before `send` returns
//! - **Subscribers**: Observers notified after every processed action
//!
//! Everything is synchronous. `send` takes `&mut self`, so only one action is
//! ever in flight and every effect (including storage writes) has completed
//! by the time `send` returns.
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};

/// Metric names and descriptions
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use composable_todo_core::storage::StorageError;
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// A persist effect failed
        ///
        /// The reducer has already updated in-memory state; only the write
        /// to storage was lost.
        #[error("Storage write failed: {0}")]
        Storage(#[from] StorageError),
    }
}

pub use error::StoreError;

/// Handle returned by [`store::Store::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Store module - The runtime for reducers
pub mod store {
    use super::{Effect, Reducer, StoreError, SubscriptionId};
    use super::metrics::{
        ACTIONS_TOTAL, EFFECTS_COUNT, PERSIST_BYTES, PERSIST_FAILURES, PERSIST_TOTAL,
        REDUCER_DURATION_SECONDS, counter, histogram,
    };

    /// Observer invoked with each processed action and the resulting state
    type Listener<A, S> = Box<dyn FnMut(&A, &S)>;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (exclusively owned)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution
    /// 5. Subscribers (observation for UI layers)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        subscribers: Vec<(SubscriptionId, Listener<A, S>)>,
        next_subscription: u64,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Clone + std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                subscribers: Vec::new(),
                next_subscription: 0,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then executes every returned effect in order.
        /// Subscribers are notified once effects have run, whether or not
        /// they succeeded.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Storage`] if a persist effect failed.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<(), StoreError> {
            tracing::debug!(?action, "Processing action");
            counter!(ACTIONS_TOTAL).increment(1);

            let observed = (!self.subscribers.is_empty()).then(|| action.clone());

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                histogram!(REDUCER_DURATION_SECONDS).record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                // Note: Precision loss acceptable for metrics (effect counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                histogram!(EFFECTS_COUNT).record(effects.len() as f64);

                effects
            };

            let result = effects
                .into_iter()
                .try_for_each(Self::execute_effect);

            if let Some(action) = observed {
                for (_, listener) in &mut self.subscribers {
                    listener(&action, &self.state);
                }
            }

            result
        }

        fn execute_effect(effect: Effect) -> Result<(), StoreError> {
            match effect {
                Effect::Persist(operation) => {
                    let key = operation.key().to_string();
                    match operation.execute() {
                        Ok(bytes) => {
                            tracing::trace!(key = %key, bytes, "Persisted");
                            counter!(PERSIST_TOTAL).increment(1);
                            #[allow(clippy::cast_precision_loss)]
                            histogram!(PERSIST_BYTES).record(bytes as f64);
                            Ok(())
                        },
                        Err(error) => {
                            tracing::error!(key = %key, error = %error, "Persist failed");
                            counter!(PERSIST_FAILURES).increment(1);
                            Err(StoreError::Storage(error))
                        },
                    }
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.items.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Register a listener called after every processed action
        pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
        where
            F: FnMut(&A, &S) + 'static,
        {
            let id = SubscriptionId(self.next_subscription);
            self.next_subscription += 1;
            self.subscribers.push((id, Box::new(listener)));
            id
        }

        /// Remove a listener; returns false if it was not registered
        pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
            let before = self.subscribers.len();
            self.subscribers.retain(|(existing, _)| *existing != id);
            self.subscribers.len() != before
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use composable_todo_core::{
        effect::PersistOperation, smallvec, storage::KeyValueStorage, SmallVec,
    };
    use composable_todo_testing::mocks::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        IncrementAndSave,
    }

    #[derive(Clone)]
    struct TestEnv {
        storage: Arc<MemoryStorage>,
    }

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect; 4]> {
            state.value += 1;
            match action {
                TestAction::Increment => SmallVec::new(),
                TestAction::IncrementAndSave => {
                    let value = state.value;
                    smallvec![Effect::Persist(PersistOperation::new(
                        env.storage.clone(),
                        "value",
                        move || serde_json::to_string(&value),
                    ))]
                },
            }
        }
    }

    fn test_store() -> (Store<TestState, TestAction, TestEnv, TestReducer>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let env = TestEnv {
            storage: storage.clone(),
        };
        (Store::new(TestState { value: 0 }, TestReducer, env), storage)
    }

    #[test]
    fn test_send_updates_state() {
        let (mut store, storage) = test_store();
        store.send(TestAction::Increment).unwrap();
        store.send(TestAction::Increment).unwrap();
        assert_eq!(store.state(|s| s.value), 2);
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_persist_effect_runs_before_send_returns() {
        let (mut store, storage) = test_store();
        store.send(TestAction::IncrementAndSave).unwrap();
        assert_eq!(storage.get("value").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_storage_failure_is_reported() {
        let (mut store, storage) = test_store();
        storage.fail_writes(true);

        let result = store.send(TestAction::IncrementAndSave);
        assert!(matches!(result, Err(StoreError::Storage(_))));
        // State change is kept, only the write was lost
        assert_eq!(store.state(|s| s.value), 1);
        assert_eq!(storage.get("value").unwrap(), None);
    }

    #[test]
    fn test_subscribers_observe_actions_and_state() {
        let (mut store, _) = test_store();
        let seen: Rc<RefCell<Vec<(TestAction, i32)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |action, state| {
            sink.borrow_mut().push((action.clone(), state.value));
        });

        store.send(TestAction::Increment).unwrap();
        store.send(TestAction::IncrementAndSave).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![(TestAction::Increment, 1), (TestAction::IncrementAndSave, 2)]
        );

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.send(TestAction::Increment).unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_subscribers_notified_even_when_persist_fails() {
        let (mut store, storage) = test_store();
        storage.fail_writes(true);
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        store.subscribe(move |_, _| *counter.borrow_mut() += 1);

        assert!(store.send(TestAction::IncrementAndSave).is_err());
        assert_eq!(*calls.borrow(), 1);
    }
}
