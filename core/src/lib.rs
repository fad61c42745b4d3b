//! # Composable Todo Core
//!
//! Core traits and types for the Composable Todo architecture.
//!
//! This crate provides the abstractions the todo engine is built from: a pure
//! reducer, effect descriptions returned from it, and the injected
//! capabilities (clock, key-value storage) the effects run against.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use composable_todo_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Key-value storage capability and its errors
pub mod storage;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero or one effect, hence the inline
        /// capacity of four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution); the store executes them synchronously
/// before `send` returns.
pub mod effect {
    use crate::storage::{KeyValueStorage, StorageError};
    use std::sync::Arc;

    /// Deferred encoder producing the value a [`PersistOperation`] writes.
    type Encoder = Box<dyn FnOnce() -> Result<String, StorageError> + Send>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime. A reducer with
    /// nothing to do returns an empty effect list.
    pub enum Effect {
        /// Write a value to key-value storage
        Persist(PersistOperation),
    }

    impl std::fmt::Debug for Effect {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::Persist(operation) => {
                    f.debug_tuple("Effect::Persist").field(operation).finish()
                },
            }
        }
    }

    /// A pending write of one value under one storage key
    ///
    /// Encoding is deferred until execution so that serialization failures
    /// surface through the store like any other storage failure.
    pub struct PersistOperation {
        storage: Arc<dyn KeyValueStorage>,
        key: String,
        encode: Encoder,
    }

    impl PersistOperation {
        /// Persist whatever `encode` produces under `key`
        #[must_use]
        pub fn new<F, E>(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>, encode: F) -> Self
        where
            F: FnOnce() -> Result<String, E> + Send + 'static,
            E: Into<StorageError>,
        {
            Self {
                storage,
                key: key.into(),
                encode: Box::new(move || encode().map_err(Into::<StorageError>::into)),
            }
        }

        /// The storage key this operation writes
        #[must_use]
        pub fn key(&self) -> &str {
            &self.key
        }

        /// Encode the value and write it, returning the number of bytes written
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if encoding fails or the storage rejects the write.
        pub fn execute(self) -> Result<usize, StorageError> {
            let value = (self.encode)()?;
            let bytes = value.len();
            self.storage.set(&self.key, value)?;
            Ok(bytes)
        }
    }

    impl std::fmt::Debug for PersistOperation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("PersistOperation")
                .field("key", &self.key)
                .finish_non_exhaustive()
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{DateTime, Utc};
    /// use composable_todo_core::environment::Clock;
    ///
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
