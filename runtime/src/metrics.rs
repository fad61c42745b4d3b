//! Metric names and descriptions recorded by the store.
//!
//! The store records through the `metrics` facade. Without an installed
//! recorder every macro call is a no-op, so embedding applications opt in by
//! installing whatever exporter they use and calling
//! [`describe_store_metrics`] once at startup.

use metrics::{describe_counter, describe_histogram};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Actions sent to any store
pub const ACTIONS_TOTAL: &str = "store.actions.total";
/// Effects returned per reduced action
pub const EFFECTS_COUNT: &str = "store.effects.count";
/// Time spent inside the reducer
pub const REDUCER_DURATION_SECONDS: &str = "store.reducer.duration_seconds";
/// Successful storage writes
pub const PERSIST_TOTAL: &str = "store.persist.total";
/// Bytes written to storage
pub const PERSIST_BYTES: &str = "store.persist.bytes";
/// Failed storage writes
pub const PERSIST_FAILURES: &str = "store.persist.failures";

/// Register descriptions for every store metric.
pub fn describe_store_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions sent to stores");
    describe_histogram!(EFFECTS_COUNT, "Number of effects returned per reduced action");
    describe_histogram!(
        REDUCER_DURATION_SECONDS,
        "Time taken by the reducer to process one action"
    );
    describe_counter!(PERSIST_TOTAL, "Total number of successful storage writes");
    describe_histogram!(PERSIST_BYTES, "Size in bytes of each storage write");
    describe_counter!(PERSIST_FAILURES, "Total number of failed storage writes");
}
