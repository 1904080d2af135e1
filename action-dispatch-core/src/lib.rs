//! Core types for action-dispatch
//!
//! This crate provides the building blocks for Redux-style state management:
//! plain action factories, a request/success/failure convention for async
//! work, and middleware that runs that async work on a tokio runtime.
//!
//! # Core Concepts
//!
//! - **Action**: a `type` string plus named fields
//! - **AsyncAction**: three action types, a promise function and a payload
//! - **Middleware**: intercepts everything dispatched before the reducer sees it
//! - **Store**: state container with a reducer and a middleware chain
//!
//! # Basic Example
//!
//! ```
//! use action_dispatch_core::prelude::*;
//!
//! fn reducer(count: &mut i64, action: &Action) -> bool {
//!     match action.action_type() {
//!         "counter/add" => {
//!             *count += action.get("by").and_then(|v| v.as_i64()).unwrap_or(1);
//!             true
//!         }
//!         _ => false,
//!     }
//! }
//!
//! let add = create_action("counter/add", ["by"]);
//! let store = Store::new(0, reducer);
//! store.dispatch(add.create([5])).unwrap();
//! assert_eq!(store.state(), 5);
//! ```
//!
//! # Async Actions
//!
//! An async action names three action types. [`AsyncMiddleware`] dispatches
//! the first one immediately, calls the promise, and dispatches the second or
//! the third once the promise settles:
//!
//! ```ignore
//! let [request, success, failure] = create_async_action_types("user/fetch");
//! let fetch_user = create_async_action(
//!     [request, success, failure],
//!     Some(promise_fn(|args| async move { api::fetch_user(&args[0]).await })),
//!     None,
//!     ["id"],
//! )?;
//!
//! let store = Store::with_middleware(AppState::default(), reducer, create_async_middleware());
//! store.dispatch(fetch_user.create([42]))?;
//! // reducer sees: user/fetch/request { id: 42 }
//! // later:        user/fetch/success { id: 42, response: ... }
//! ```

pub mod action;
pub mod async_action;
pub mod async_types;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod promise;
pub mod store;
pub mod testing;

// Action exports
pub use action::{create_action, Action, ActionCreator, Payload, TYPE_FIELD};
pub use async_types::{
    create_async_action_types, create_async_action_types_with_delimiter, ASYNC_SUFFIXES,
    DEFAULT_DELIMITER,
};

// Async action exports
pub use async_action::{
    always_call, create_async_action, promise_fn, should_call_promise, validate_async_action,
    AsyncAction, AsyncActionCreator, PromiseFn, PromiseFuture, PromiseResult, ShouldCallPromise,
};
pub use promise::{call_promise, Settlement, ERROR_FIELD, RESPONSE_FIELD};

// Error exports
pub use error::{DispatchError, HandlerError, ValidationError};

// Store exports
pub use store::{
    ComposedMiddleware, DispatchResult, Dispatched, Dispatcher, LoggingMiddleware, Middleware,
    Next, NoopMiddleware, Reducer, Store, StoreApi, StoreRef,
};

// Middleware exports
pub use middleware::{
    create_async_middleware, create_middleware, handler, AsyncMiddleware, Handler,
    HandlerMiddleware,
};

// Logging exports
pub use logger::{glob_match, ActionLoggerConfig};

// Testing exports
pub use testing::{action_types, RecordingStore, TestHarness};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{create_action, Action, ActionCreator, Payload};
    pub use crate::async_action::{
        always_call, create_async_action, promise_fn, should_call_promise, AsyncAction,
        AsyncActionCreator,
    };
    pub use crate::async_types::create_async_action_types;
    pub use crate::error::{DispatchError, ValidationError};
    pub use crate::logger::ActionLoggerConfig;
    pub use crate::middleware::{
        create_async_middleware, create_middleware, handler, AsyncMiddleware, HandlerMiddleware,
    };
    pub use crate::promise::call_promise;
    pub use crate::store::{
        ComposedMiddleware, DispatchResult, Dispatched, Dispatcher, LoggingMiddleware,
        Middleware, NoopMiddleware, Reducer, Store, StoreApi, StoreRef,
    };
}
