//! Naming convention for async action type triples

/// Delimiter used by [`create_async_action_types`].
pub const DEFAULT_DELIMITER: &str = "/";

/// Suffixes appended to the base type, in triple order.
pub const ASYNC_SUFFIXES: [&str; 3] = ["request", "success", "failure"];

/// Create request, success and failure types for an async action.
///
/// ```
/// use action_dispatch_core::create_async_action_types;
///
/// let [request, success, failure] = create_async_action_types("call/api");
/// assert_eq!(request, "call/api/request");
/// assert_eq!(success, "call/api/success");
/// assert_eq!(failure, "call/api/failure");
/// ```
pub fn create_async_action_types(base: &str) -> [String; 3] {
    create_async_action_types_with_delimiter(base, DEFAULT_DELIMITER)
}

/// Same as [`create_async_action_types`] with a custom delimiter.
pub fn create_async_action_types_with_delimiter(base: &str, delimiter: &str) -> [String; 3] {
    ASYNC_SUFFIXES.map(|suffix| format!("{base}{delimiter}{suffix}"))
}
