//! Dispatch pipeline: store contract, middleware and a reference store

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::action::Action;
use crate::async_action::AsyncAction;
use crate::error::DispatchError;
use crate::logger::ActionLoggerConfig;

/// Result of sending something through the pipeline.
///
/// `Ok(true)` means the state changed.
pub type DispatchResult = Result<bool, DispatchError>;

/// Anything that can travel through the dispatch pipeline.
pub enum Dispatched<S> {
    /// A plain action, eventually seen by the reducer.
    Action(Action),
    /// An async action descriptor, meant for [`AsyncMiddleware`](crate::AsyncMiddleware).
    Async(AsyncAction<S>),
}

impl<S> Dispatched<S> {
    /// Whether this is an async action descriptor.
    pub fn is_async(&self) -> bool {
        matches!(self, Dispatched::Async(_))
    }

    /// The plain action, if this is one.
    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Dispatched::Action(action) => Some(action),
            Dispatched::Async(_) => None,
        }
    }

    /// Name used for logging: the action type, or the request type of an
    /// async descriptor.
    pub fn name(&self) -> &str {
        match self {
            Dispatched::Action(action) => action.action_type(),
            Dispatched::Async(action) => action.request_type().unwrap_or("<async>"),
        }
    }
}

impl<S> From<Action> for Dispatched<S> {
    fn from(action: Action) -> Self {
        Dispatched::Action(action)
    }
}

impl<S> From<AsyncAction<S>> for Dispatched<S> {
    fn from(action: AsyncAction<S>) -> Self {
        Dispatched::Async(action)
    }
}

impl<S> Clone for Dispatched<S> {
    fn clone(&self) -> Self {
        match self {
            Dispatched::Action(action) => Dispatched::Action(action.clone()),
            Dispatched::Async(action) => Dispatched::Async(action.clone()),
        }
    }
}

impl<S> PartialEq for Dispatched<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dispatched::Action(a), Dispatched::Action(b)) => a == b,
            (Dispatched::Async(a), Dispatched::Async(b)) => a == b,
            _ => false,
        }
    }
}

impl<S> fmt::Debug for Dispatched<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatched::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Dispatched::Async(action) => f.debug_tuple("Async").field(action).finish(),
        }
    }
}

/// What middleware sees of the host store.
pub trait StoreApi<S>: Send + Sync {
    /// Send an action through the whole pipeline.
    fn dispatch(&self, action: Dispatched<S>) -> DispatchResult;

    /// Snapshot of the current state.
    fn get_state(&self) -> S;
}

/// Shared handle to a store.
pub type StoreRef<S> = Arc<dyn StoreApi<S>>;

/// The rest of the pipeline after the current middleware.
pub type Next<'a, S> = &'a dyn Fn(Dispatched<S>) -> DispatchResult;

/// Cloneable dispatch function handed to handlers and the promise runner.
pub struct Dispatcher<S> {
    dispatch: Arc<dyn Fn(Dispatched<S>) -> DispatchResult + Send + Sync>,
}

impl<S> Dispatcher<S> {
    /// Wrap a dispatch closure.
    pub fn new<F>(dispatch: F) -> Self
    where
        F: Fn(Dispatched<S>) -> DispatchResult + Send + Sync + 'static,
    {
        Self {
            dispatch: Arc::new(dispatch),
        }
    }

    /// Dispatch into `store`.
    pub fn from_store(store: StoreRef<S>) -> Self
    where
        S: 'static,
    {
        Self::new(move |action| store.dispatch(action))
    }

    /// Dispatch an action or async descriptor.
    pub fn dispatch(&self, action: impl Into<Dispatched<S>>) -> DispatchResult {
        (self.dispatch)(action.into())
    }
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S> fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

/// Middleware trait for intercepting dispatched actions
///
/// A middleware may inspect or react to `action` before forwarding it. It
/// calls `next` at most once and returns its result.
pub trait Middleware<S>: Send + Sync {
    /// Handle one dispatched action.
    fn handle(
        &self,
        store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult;
}

impl<S, M: Middleware<S> + ?Sized> Middleware<S> for Box<M> {
    fn handle(
        &self,
        store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        (**self).handle(store, action, next)
    }
}

/// A middleware that forwards everything unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<S> Middleware<S> for NoopMiddleware {
    fn handle(
        &self,
        _store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        next(action)
    }
}

/// Middleware that logs actions (for debugging)
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Whether to log before forwarding
    pub log_before: bool,
    /// Whether to log after `next` returns
    pub log_after: bool,
    /// Which action types to log
    pub filter: ActionLoggerConfig,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
            filter: ActionLoggerConfig::default(),
        }
    }

    /// Create a logging middleware that logs both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            ..Self::new()
        }
    }

    /// Only log actions accepted by `filter`
    pub fn with_filter(mut self, filter: ActionLoggerConfig) -> Self {
        self.filter = filter;
        self
    }
}

impl<S> Middleware<S> for LoggingMiddleware {
    fn handle(
        &self,
        _store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        let name = action.name().to_owned();
        let enabled = self.filter.should_log(&name);
        let is_async = action.is_async();

        if enabled && self.log_before {
            tracing::debug!(action = %name, is_async, "Dispatching action");
        }

        let result = next(action);

        if enabled && self.log_after {
            match &result {
                Ok(state_changed) => tracing::debug!(
                    action = %name,
                    state_changed = *state_changed,
                    "Action processed"
                ),
                Err(err) => tracing::debug!(action = %name, error = %err, "Action failed"),
            }
        }
        result
    }
}

/// Compose multiple middleware into a single middleware
///
/// Middleware run in insertion order; each one's `next` is the remainder of
/// the chain followed by the outer `next`.
pub struct ComposedMiddleware<S> {
    middlewares: Vec<Box<dyn Middleware<S>>>,
}

impl<S> fmt::Debug for ComposedMiddleware<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<S> Default for ComposedMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ComposedMiddleware<S> {
    /// Create a new composed middleware
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware to the end of the chain
    pub fn add<M: Middleware<S> + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    /// Builder form of [`add`](Self::add)
    pub fn with<M: Middleware<S> + 'static>(mut self, middleware: M) -> Self {
        self.add(middleware);
        self
    }

    /// Number of middleware in the chain
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    fn run(
        &self,
        index: usize,
        store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        match self.middlewares.get(index) {
            Some(middleware) => {
                let rest = |action: Dispatched<S>| self.run(index + 1, store, action, next);
                middleware.handle(store, action, &rest)
            }
            None => next(action),
        }
    }
}

impl<S> Middleware<S> for ComposedMiddleware<S> {
    fn handle(
        &self,
        store: &StoreRef<S>,
        action: Dispatched<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        self.run(0, store, action, next)
    }
}

/// A reducer function that handles plain actions and mutates state
///
/// Returns `true` if the state changed.
pub type Reducer<S> = fn(&mut S, &Action) -> bool;

/// Centralized state store with a reducer and a middleware pipeline
///
/// Cheap to clone; clones share state and middleware. The state lock is only
/// held while the reducer runs, so middleware may dispatch re-entrantly and
/// spawned tasks may dispatch concurrently.
///
/// # Example
/// ```
/// use action_dispatch_core::{create_action, Action, Store};
///
/// fn reducer(count: &mut i64, action: &Action) -> bool {
///     match action.action_type() {
///         "counter/add" => {
///             *count += action.get("by").and_then(|v| v.as_i64()).unwrap_or(1);
///             true
///         }
///         _ => false,
///     }
/// }
///
/// let store = Store::new(0, reducer);
/// let add = create_action("counter/add", ["by"]);
/// assert!(store.dispatch(add.create([5])).unwrap());
/// assert_eq!(store.state(), 5);
/// ```
pub struct Store<S> {
    inner: Arc<StoreInner<S>>,
}

struct StoreInner<S> {
    state: Mutex<S>,
    reducer: Reducer<S>,
    middleware: Box<dyn Middleware<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl<S> Store<S>
where
    S: Clone + Send + 'static,
{
    /// Create a store without middleware
    pub fn new(state: S, reducer: Reducer<S>) -> Self {
        Self::with_middleware(state, reducer, NoopMiddleware)
    }

    /// Create a store whose dispatches pass through `middleware`
    pub fn with_middleware<M>(state: S, reducer: Reducer<S>, middleware: M) -> Self
    where
        M: Middleware<S> + 'static,
    {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(state),
                reducer,
                middleware: Box::new(middleware),
            }),
        }
    }

    /// Dispatch an action through middleware and reducer
    pub fn dispatch(&self, action: impl Into<Dispatched<S>>) -> DispatchResult {
        let api: StoreRef<S> = Arc::new(self.clone());
        let reduce = |action: Dispatched<S>| -> DispatchResult { Ok(self.reduce(action)) };
        self.inner.middleware.handle(&api, action.into(), &reduce)
    }

    /// Snapshot of the current state
    pub fn state(&self) -> S {
        self.lock().clone()
    }

    /// Run `f` with a reference to the state, without cloning it
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock())
    }

    /// A [`Dispatcher`] bound to this store
    pub fn dispatcher(&self) -> Dispatcher<S> {
        Dispatcher::from_store(Arc::new(self.clone()))
    }

    fn reduce(&self, action: Dispatched<S>) -> bool {
        match action {
            Dispatched::Action(action) => (self.inner.reducer)(&mut self.lock(), &action),
            Dispatched::Async(action) => {
                tracing::trace!(
                    action = %action.request_type().unwrap_or("<async>"),
                    "async action reached the reducer; ignored"
                );
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> StoreApi<S> for Store<S>
where
    S: Clone + Send + 'static,
{
    fn dispatch(&self, action: Dispatched<S>) -> DispatchResult {
        Store::dispatch(self, action)
    }

    fn get_state(&self) -> S {
        self.state()
    }
}
