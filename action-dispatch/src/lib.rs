//! action-dispatch: Redux-style action factories and middleware for Rust
//!
//! Actions are plain data, async work follows a request/success/failure
//! convention, and every side effect lives in middleware.
//!
//! # Example
//! ```
//! use action_dispatch::prelude::*;
//!
//! let [request, success, failure] = create_async_action_types("user/fetch");
//! assert_eq!(request, "user/fetch/request");
//! assert_eq!(success, "user/fetch/success");
//! assert_eq!(failure, "user/fetch/failure");
//!
//! let add_post = create_action("post/add", ["title", "body"]);
//! let action = add_post.create(["Hello", "World"]);
//! assert_eq!(action.action_type(), "post/add");
//! assert_eq!(action.get("body").and_then(|v| v.as_str()), Some("World"));
//! ```

// Re-export everything from core
pub use action_dispatch_core::*;

/// Prelude for convenient imports
pub mod prelude {
    // Action factories
    pub use action_dispatch_core::{
        create_action, create_async_action_types, Action, ActionCreator, Payload,
    };

    // Async actions
    pub use action_dispatch_core::{
        always_call, call_promise, create_async_action, promise_fn, should_call_promise,
        validate_async_action, AsyncAction, AsyncActionCreator,
    };

    // Middleware
    pub use action_dispatch_core::{
        create_async_middleware, create_middleware, handler, AsyncMiddleware, ComposedMiddleware,
        HandlerMiddleware, LoggingMiddleware, Middleware, NoopMiddleware,
    };

    // Store
    pub use action_dispatch_core::{
        DispatchResult, Dispatched, Dispatcher, Reducer, Store, StoreApi, StoreRef,
    };

    // Errors and logging
    pub use action_dispatch_core::{ActionLoggerConfig, DispatchError, ValidationError};
}
