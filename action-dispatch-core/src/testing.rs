//! Test utilities for middleware and async actions
//!
//! This module provides helpers for testing code built on action-dispatch:
//!
//! - [`RecordingStore`]: a [`StoreApi`] that records every dispatch
//! - [`TestHarness`]: calls a middleware the way a store would, recording
//!   what it dispatches and what it forwards to `next`
//! - Assertion macros for verifying dispatched actions
//!
//! # Example
//!
//! ```
//! use action_dispatch_core::testing::TestHarness;
//! use action_dispatch_core::{assert_dispatched, Action, Dispatched, NoopMiddleware};
//!
//! let harness = TestHarness::new(());
//! harness.invoke(&NoopMiddleware, Action::new("ping")).unwrap();
//!
//! let forwarded = harness.drain_forwarded();
//! assert_dispatched!(forwarded, Dispatched::Action(a) if a.action_type() == "ping");
//! assert!(harness.drain_dispatched().is_empty());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::store::{DispatchResult, Dispatched, Dispatcher, Middleware, StoreApi, StoreRef};

/// A store that records dispatches instead of reducing them.
///
/// `dispatch` always returns `Ok(false)`. `get_state` returns a clone of the
/// current state and counts the call.
pub struct RecordingStore<S> {
    state: Mutex<S>,
    get_state_calls: AtomicUsize,
    tx: mpsc::UnboundedSender<Dispatched<S>>,
    rx: Mutex<mpsc::UnboundedReceiver<Dispatched<S>>>,
}

impl<S> RecordingStore<S> {
    /// Create a recording store holding `state`.
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: Mutex::new(state),
            get_state_calls: AtomicUsize::new(0),
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Replace the state returned by `get_state`.
    pub fn set_state(&self, state: S) {
        *lock(&self.state) = state;
    }

    /// How many times `get_state` was called.
    pub fn get_state_calls(&self) -> usize {
        self.get_state_calls.load(Ordering::SeqCst)
    }

    /// Drain everything dispatched so far, oldest first.
    pub fn drain_dispatched(&self) -> Vec<Dispatched<S>> {
        drain(&self.rx)
    }
}

impl<S: Clone + Send> StoreApi<S> for RecordingStore<S> {
    fn dispatch(&self, action: Dispatched<S>) -> DispatchResult {
        let _ = self.tx.send(action);
        Ok(false)
    }

    fn get_state(&self) -> S {
        self.get_state_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.state).clone()
    }
}

/// Harness that calls a middleware with a recording store and `next`.
///
/// # Type Parameters
///
/// - `S`: The state type handed to middleware
///
/// # Example
///
/// ```ignore
/// let harness = TestHarness::new(AppState::default());
/// harness.invoke(&create_async_middleware(), fetch_user.create([42]))?;
///
/// assert_eq!(action_types(&harness.drain_dispatched()), vec!["user/fetch/request"]);
/// assert_eq!(harness.drain_forwarded().len(), 1);
/// ```
pub struct TestHarness<S> {
    store: Arc<RecordingStore<S>>,
    forwarded_tx: mpsc::UnboundedSender<Dispatched<S>>,
    forwarded_rx: Mutex<mpsc::UnboundedReceiver<Dispatched<S>>>,
}

impl<S: Clone + Send + 'static> TestHarness<S> {
    /// Create a new test harness with the given initial state.
    pub fn new(state: S) -> Self {
        let (forwarded_tx, forwarded_rx) = mpsc::unbounded_channel();
        Self {
            store: Arc::new(RecordingStore::new(state)),
            forwarded_tx,
            forwarded_rx: Mutex::new(forwarded_rx),
        }
    }

    /// The recording store as middleware see it.
    pub fn store(&self) -> StoreRef<S> {
        self.store.clone()
    }

    /// A dispatcher writing into the recording store.
    pub fn dispatcher(&self) -> Dispatcher<S> {
        Dispatcher::from_store(self.store())
    }

    /// Replace the state returned by `get_state`.
    pub fn set_state(&self, state: S) {
        self.store.set_state(state);
    }

    /// Run `middleware` once with a recording `next` that returns `Ok(false)`.
    pub fn invoke<M>(&self, middleware: &M, action: impl Into<Dispatched<S>>) -> DispatchResult
    where
        M: Middleware<S> + ?Sized,
    {
        let store = self.store();
        let next = |action: Dispatched<S>| -> DispatchResult {
            let _ = self.forwarded_tx.send(action);
            Ok(false)
        };
        middleware.handle(&store, action.into(), &next)
    }

    /// Drain everything the middleware dispatched to the store.
    pub fn drain_dispatched(&self) -> Vec<Dispatched<S>> {
        self.store.drain_dispatched()
    }

    /// Drain everything the middleware forwarded to `next`.
    pub fn drain_forwarded(&self) -> Vec<Dispatched<S>> {
        drain(&self.forwarded_rx)
    }

    /// How many times middleware read the state.
    pub fn get_state_calls(&self) -> usize {
        self.store.get_state_calls()
    }
}

impl<S: Clone + Default + Send + 'static> Default for TestHarness<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Names of `items` as reported by [`Dispatched::name`].
pub fn action_types<S>(items: &[Dispatched<S>]) -> Vec<&str> {
    items.iter().map(Dispatched::name).collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn drain<T>(rx: &Mutex<mpsc::UnboundedReceiver<T>>) -> Vec<T> {
    let mut rx = lock(rx);
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}

/// Assert that a matching item was dispatched.
///
/// # Example
///
/// ```ignore
/// let dispatched = harness.drain_dispatched();
/// assert_dispatched!(dispatched, Dispatched::Action(a) if a.action_type() == "user/fetch/request");
/// ```
#[macro_export]
macro_rules! assert_dispatched {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $items.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected item matching `{}` to be dispatched, but got: {:?}",
            stringify!($pattern),
            $items
        );
    };
}

/// Assert that no matching item was dispatched.
///
/// # Example
///
/// ```ignore
/// let dispatched = harness.drain_dispatched();
/// assert_not_dispatched!(dispatched, Dispatched::Async(_));
/// ```
#[macro_export]
macro_rules! assert_not_dispatched {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$items.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected item matching `{}` NOT to be dispatched, but it was: {:?}",
            stringify!($pattern),
            $items
        );
    };
}

/// Find and return the first item matching a pattern.
#[macro_export]
macro_rules! find_dispatched {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        $items.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count how many items match a pattern.
#[macro_export]
macro_rules! count_dispatched {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        $items.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}
