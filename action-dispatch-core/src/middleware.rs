//! Handler and async-action middleware
//!
//! - [`HandlerMiddleware`] runs synchronous side effects keyed by action type.
//! - [`AsyncMiddleware`] runs the promise of each [`AsyncAction`](crate::AsyncAction)
//!   and dispatches its request/success/failure actions.
//!
//! Both always forward the original action to `next`.
//!
//! # Example
//!
//! ```ignore
//! use action_dispatch::prelude::*;
//!
//! let handlers = HandlerMiddleware::new().on("session/logout", |_state, _action, dispatch| {
//!     dispatch.dispatch(Action::new("cache/clear"))?;
//!     Ok(())
//! });
//!
//! let store = Store::with_middleware(
//!     AppState::default(),
//!     reducer,
//!     ComposedMiddleware::new()
//!         .with(handlers)
//!         .with(create_async_middleware()),
//! );
//! ```

use std::collections::HashMap;
use std::fmt;

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use crate::action::Action;
use crate::error::{DispatchError, HandlerError};
use crate::promise::call_promise;
use crate::store::{DispatchResult, Dispatched, Dispatcher, Middleware, Next, StoreRef};

/// Synchronous reaction to an action: `(state, action, dispatch)`.
pub type Handler<S> =
    Box<dyn Fn(&S, &Action, &Dispatcher<S>) -> Result<(), HandlerError> + Send + Sync>;

/// Box a closure as a [`Handler`].
pub fn handler<S, F>(f: F) -> Handler<S>
where
    F: Fn(&S, &Action, &Dispatcher<S>) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Middleware running a handler for each action type it knows.
///
/// A handler runs before the action is forwarded. Its error aborts the
/// dispatch; the action then never reaches `next`.
pub struct HandlerMiddleware<S> {
    handlers: HashMap<String, Handler<S>>,
}

impl<S> Default for HandlerMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HandlerMiddleware<S> {
    /// Create a middleware with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `action_type`, replacing any previous one.
    pub fn on<F>(mut self, action_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&S, &Action, &Dispatcher<S>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(action_type.into(), Box::new(handler));
        self
    }

    /// Whether a handler is registered for `action_type`.
    pub fn handles(&self, action_type: &str) -> bool {
        self.handlers.contains_key(action_type)
    }
}

impl<S> fmt::Debug for HandlerMiddleware<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.handlers.keys().collect();
        types.sort();
        f.debug_struct("HandlerMiddleware")
            .field("action_types", &types)
            .finish()
    }
}

impl<S: 'static> Middleware<S> for HandlerMiddleware<S> {
    fn handle(
        &self,
        store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        if let Dispatched::Action(plain) = &action {
            if let Some(handler) = self.handlers.get(plain.action_type()) {
                tracing::debug!(action = %plain.action_type(), "running handler");
                let state = store.get_state();
                let dispatcher = Dispatcher::from_store(store.clone());
                handler(&state, plain, &dispatcher).map_err(|source| DispatchError::Handler {
                    action_type: plain.action_type().to_owned(),
                    source,
                })?;
            }
        }

        next(action)
    }
}

/// Create a middleware from `(action type, handler)` pairs.
///
/// ```
/// use action_dispatch_core::{create_middleware, handler, Action, Dispatcher};
///
/// let middleware = create_middleware([(
///     "post/add",
///     handler(|_state: &(), _action: &Action, _dispatch: &Dispatcher<()>| Ok(())),
/// )]);
/// assert!(middleware.handles("post/add"));
/// ```
pub fn create_middleware<S, I, K>(handlers: I) -> HandlerMiddleware<S>
where
    I: IntoIterator<Item = (K, Handler<S>)>,
    K: Into<String>,
{
    HandlerMiddleware {
        handlers: handlers
            .into_iter()
            .map(|(action_type, handler)| (action_type.into(), handler))
            .collect(),
    }
}

/// Middleware for async actions.
///
/// For each [`Dispatched::Async`] descriptor:
/// 1. validate it; an invalid one fails the dispatch,
/// 2. skip the promise when `should_call_promise(state)` is false,
/// 3. otherwise dispatch the request, call the promise and spawn its
///    settlement,
/// 4. forward the descriptor to `next` without waiting.
///
/// Plain actions are forwarded untouched. Clones share the set of in-flight
/// settlements.
#[derive(Debug, Clone, Default)]
pub struct AsyncMiddleware {
    runtime: Option<Handle>,
    tracker: TaskTracker,
}

impl AsyncMiddleware {
    /// Spawn settlements on the runtime current at dispatch time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn settlements on `runtime`.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime: Some(runtime),
            ..Self::default()
        }
    }

    /// Number of settlements still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every settlement spawned so far has dispatched.
    pub async fn settled(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    fn runtime(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }
}

impl<S: 'static> Middleware<S> for AsyncMiddleware {
    fn handle(
        &self,
        store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        let async_action = match action {
            Dispatched::Async(async_action) => async_action,
            plain => return next(plain),
        };

        let should_call = {
            let checked = async_action.checked()?;
            (checked.should_call_promise)(&store.get_state())
        };
        let request_type = async_action.request_type().unwrap_or_default().to_owned();

        if !should_call {
            tracing::debug!(action = %request_type, "promise skipped by shouldCallPromise");
            return next(Dispatched::Async(async_action));
        }

        let runtime = self.runtime().ok_or_else(|| DispatchError::NoRuntime {
            action_type: request_type.clone(),
        })?;
        let settlement = call_promise(Dispatcher::from_store(store.clone()), &async_action)?;
        self.tracker.spawn_on(settlement, &runtime);
        tracing::trace!(
            action = %request_type,
            in_flight = self.tracker.len(),
            "settlement spawned"
        );

        next(Dispatched::Async(async_action))
    }
}

/// Create the middleware for async actions.
pub fn create_async_middleware() -> AsyncMiddleware {
    AsyncMiddleware::new()
}
