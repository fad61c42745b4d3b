//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants in reducers.

/// Create an `Effect::Persist` that writes the output of an encoder
///
/// The encoder runs when the store executes the effect, not when the macro
/// is evaluated. Its error type must convert into `StorageError`.
///
/// # Example
///
/// ```rust,ignore
/// use composable_todo_core::persist;
///
/// persist! {
///     storage: env.storage,
///     key: env.storage_key,
///     encode: move || persistence::encode(&items, format)
/// }
/// ```
#[macro_export]
macro_rules! persist {
    (
        storage: $storage:expr,
        key: $key:expr,
        encode: $encode:expr
    ) => {
        $crate::effect::Effect::Persist($crate::effect::PersistOperation::new(
            ::std::sync::Arc::clone(&$storage),
            $key.clone(),
            $encode,
        ))
    };
}
