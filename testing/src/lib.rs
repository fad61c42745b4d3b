//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the Composable Todo architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (clocks, storage)
//! - The `ReducerTest` Given-When-Then harness
//! - Assertion helpers for effects
//! - Test tracing setup
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{test_clock, MemoryStorage};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let store = TodoStore::open(TodoEnvironment::new(Arc::new(test_clock()), storage.clone(), "todos"));
//! ```

use chrono::{DateTime, Duration, Utc};
use composable_todo_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use composable_todo_core::storage::{KeyValueStorage, StorageError};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_testing::mocks::FixedClock;
    /// use composable_todo_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Clock that advances by a fixed step on every read
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use composable_todo_core::environment::Clock;
    /// use composable_todo_testing::mocks::SteppingClock;
    ///
    /// let start = Utc::now();
    /// let clock = SteppingClock::new(start, Duration::milliseconds(5));
    /// assert_eq!(clock.now(), start);
    /// assert_eq!(clock.now(), start + Duration::milliseconds(5));
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` that advances by `step` per read
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = match self.next.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// In-memory key-value storage with failure injection
    ///
    /// Stands in for browser local storage in tests. Writes can be made to
    /// fail on demand and a byte quota can be imposed.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        entries: Mutex<HashMap<String, String>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        quota: Option<usize>,
        writes: AtomicUsize,
    }

    impl MemoryStorage {
        /// Create an empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populate a key (does not count as a write)
        #[must_use]
        pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
            if let Ok(mut entries) = self.entries.lock() {
                entries.insert(key.into(), value.into());
            }
            self
        }

        /// Reject any single value larger than `bytes`
        #[must_use]
        pub const fn with_quota(mut self, bytes: usize) -> Self {
            self.quota = Some(bytes);
            self
        }

        /// Make every subsequent `get` fail (or succeed again)
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Make every subsequent `set` fail (or succeed again)
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of successful writes so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
            self.entries
                .lock()
                .map_err(|e| StorageError::Unavailable(e.to_string()))
        }
    }

    impl KeyValueStorage for MemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("reads disabled".to_string()));
            }
            Ok(self.lock()?.get(key).cloned())
        }

        fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("writes disabled".to_string()));
            }
            if let Some(quota) = self.quota {
                if value.len() > quota {
                    return Err(StorageError::QuotaExceeded {
                        key: key.to_string(),
                        bytes: value.len(),
                    });
                }
            }
            self.lock()?.insert(key.to_string(), value);
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a tracing subscriber that writes through the test harness
    ///
    /// Safe to call from every test; only the first call installs anything.
    /// Honors `RUST_LOG`, defaulting to `debug`.
    pub fn init_test_tracing() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedClock, MemoryStorage, SteppingClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
