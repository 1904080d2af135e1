//! Async action descriptors, their factory and validation
//!
//! An async action does not change state by itself. It describes a deferred
//! call (the *promise*) plus the three action types dispatched around it:
//!
//! 1. `request` before the call starts,
//! 2. `success` with a `response` field when it resolves,
//! 3. `failure` with an `error` field when it rejects.
//!
//! The descriptor fields are public so hosts can build descriptors by hand,
//! which is why they are loosely typed and checked by
//! [`validate_async_action`] before use.
//!
//! # Example
//!
//! ```
//! use action_dispatch_core::{create_async_action, create_async_action_types, promise_fn};
//! use serde_json::json;
//!
//! let fetch_user = create_async_action::<(), _, _>(
//!     create_async_action_types("user/fetch"),
//!     Some(promise_fn(|args| async move { Ok(json!({ "id": args[0] })) })),
//!     None,
//!     ["id"],
//! )
//! .unwrap();
//!
//! let action = fetch_user.create([42]);
//! assert_eq!(action.payload, json!({ "id": 42 }));
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::action::{bind_positional, Payload};
use crate::error::ValidationError;

/// Outcome of a promise: `Ok(response)` or `Err(error)`.
pub type PromiseResult = Result<Value, Value>;

/// Boxed future returned by a [`PromiseFn`].
pub type PromiseFuture = Pin<Box<dyn Future<Output = PromiseResult> + Send + 'static>>;

/// Deferred call receiving the payload values in insertion order.
pub type PromiseFn = Arc<dyn Fn(Vec<Value>) -> PromiseFuture + Send + Sync>;

/// Predicate deciding from the current state whether the promise runs.
pub type ShouldCallPromise<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Wrap an async closure as a [`PromiseFn`].
pub fn promise_fn<F, Fut>(f: F) -> PromiseFn
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PromiseResult> + Send + 'static,
{
    Arc::new(move |args| -> PromiseFuture { Box::pin(f(args)) })
}

/// Wrap a closure as a [`ShouldCallPromise`] predicate.
pub fn should_call_promise<S, F>(f: F) -> ShouldCallPromise<S>
where
    F: Fn(&S) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Predicate that always lets the promise run.
pub fn always_call<S>() -> ShouldCallPromise<S> {
    Arc::new(|_: &S| true)
}

/// Descriptor for a deferred call and its request/success/failure types.
///
/// Equality compares `types` and `payload` by value and the callables by
/// pointer identity.
pub struct AsyncAction<S> {
    /// `[request, success, failure]`; valid when exactly three strings.
    pub types: Vec<Value>,
    /// The deferred call.
    pub promise: Option<PromiseFn>,
    /// Gate evaluated against the store state before calling `promise`.
    pub should_call_promise: Option<ShouldCallPromise<S>>,
    /// Named arguments; valid when a JSON object.
    pub payload: Value,
}

impl<S> AsyncAction<S> {
    /// Create a descriptor with an always-true gate and an empty payload.
    pub fn new<T>(types: T, promise: PromiseFn) -> Self
    where
        T: IntoIterator,
        T::Item: Into<Value>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            promise: Some(promise),
            should_call_promise: Some(always_call()),
            payload: Value::Object(Payload::new()),
        }
    }

    /// Replace the gate predicate.
    pub fn with_should_call_promise(mut self, predicate: ShouldCallPromise<S>) -> Self {
        self.should_call_promise = Some(predicate);
        self
    }

    /// Replace the payload.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Value::Object(payload);
        self
    }

    /// The request type, when `types` is well formed.
    pub fn request_type(&self) -> Option<&str> {
        self.checked_types().ok().map(|[request, _, _]| request)
    }

    fn checked_types(&self) -> Result<[&str; 3], ValidationError> {
        match self.types.as_slice() {
            [Value::String(request), Value::String(success), Value::String(failure)] => {
                Ok([request.as_str(), success.as_str(), failure.as_str()])
            }
            _ => Err(ValidationError::InvalidTypes),
        }
    }

    /// Run every check and hand back typed views of the fields.
    pub(crate) fn checked(&self) -> Result<CheckedAsyncAction<'_, S>, ValidationError> {
        let types = self.checked_types()?;
        let promise = self
            .promise
            .as_ref()
            .ok_or(ValidationError::PromiseNotCallable)?;
        let should_call_promise = self
            .should_call_promise
            .as_ref()
            .ok_or(ValidationError::ShouldCallPromiseNotCallable)?;
        let payload = self
            .payload
            .as_object()
            .ok_or(ValidationError::PayloadNotObject)?;

        Ok(CheckedAsyncAction {
            types,
            promise,
            should_call_promise,
            payload,
        })
    }
}

/// Borrowed, validated view of an [`AsyncAction`].
pub(crate) struct CheckedAsyncAction<'a, S> {
    pub types: [&'a str; 3],
    pub promise: &'a PromiseFn,
    pub should_call_promise: &'a ShouldCallPromise<S>,
    pub payload: &'a Payload,
}

impl<S> Clone for AsyncAction<S> {
    fn clone(&self) -> Self {
        Self {
            types: self.types.clone(),
            promise: self.promise.clone(),
            should_call_promise: self.should_call_promise.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl<S> PartialEq for AsyncAction<S> {
    fn eq(&self, other: &Self) -> bool {
        fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }

        self.types == other.types
            && self.payload == other.payload
            && same(&self.promise, &other.promise)
            && same(&self.should_call_promise, &other.should_call_promise)
    }
}

impl<S> fmt::Debug for AsyncAction<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncAction")
            .field("types", &self.types)
            .field("promise", &self.promise.as_ref().map(|_| "<fn>"))
            .field(
                "should_call_promise",
                &self.should_call_promise.as_ref().map(|_| "<fn>"),
            )
            .field("payload", &self.payload)
            .finish()
    }
}

/// Check the shape of an async action descriptor.
///
/// The checks run in this order and the first failure is returned:
/// `types`, `promise`, `should_call_promise`, `payload`.
pub fn validate_async_action<S>(action: &AsyncAction<S>) -> Result<(), ValidationError> {
    action.checked().map(|_| ())
}

/// Factory for async actions with positionally bound payloads.
///
/// Created with [`create_async_action`].
pub struct AsyncActionCreator<S> {
    template: AsyncAction<S>,
    arg_names: Vec<String>,
}

impl<S> AsyncActionCreator<S> {
    /// Payload field names, in binding order.
    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    /// Build a descriptor with a fresh payload bound from `args`.
    ///
    /// Binding follows [`ActionCreator::create`](crate::ActionCreator::create).
    pub fn create<I>(&self, args: I) -> AsyncAction<S>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut action = self.template.clone();
        action.payload = Value::Object(bind_positional(&self.arg_names, args));
        action
    }
}

impl<S> fmt::Debug for AsyncActionCreator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncActionCreator")
            .field("template", &self.template)
            .field("arg_names", &self.arg_names)
            .finish()
    }
}

/// Create an async action factory.
///
/// The static parts are validated immediately, so a malformed `types` or a
/// missing `promise` fails here rather than at dispatch time. A `None` gate
/// means the promise always runs.
pub fn create_async_action<S, T, N>(
    types: T,
    promise: Option<PromiseFn>,
    should_call_promise: Option<ShouldCallPromise<S>>,
    arg_names: N,
) -> Result<AsyncActionCreator<S>, ValidationError>
where
    T: IntoIterator,
    T::Item: Into<Value>,
    N: IntoIterator,
    N::Item: Into<String>,
{
    let template = AsyncAction {
        types: types.into_iter().map(Into::into).collect(),
        promise,
        should_call_promise: Some(should_call_promise.unwrap_or_else(always_call)),
        payload: Value::Object(Payload::new()),
    };
    validate_async_action(&template)?;

    Ok(AsyncActionCreator {
        template,
        arg_names: arg_names.into_iter().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TYPES: [&str; 3] = ["ASYNC_REQUEST", "ASYNC_SUCCESS", "ASYNC_FAILURE"];

    fn pending() -> PromiseFn {
        promise_fn(|_| std::future::pending())
    }

    fn valid() -> AsyncAction<()> {
        AsyncAction::new(TYPES, pending())
    }

    #[test]
    fn test_create_async_action() {
        let creator =
            create_async_action::<(), _, _>(TYPES, Some(pending()), None, ["value"]).unwrap();
        let action = creator.create([1]);

        assert_eq!(action.types, TYPES.map(Value::from).to_vec());
        assert!(action.promise.is_some());
        assert!(action.should_call_promise.is_some());
        assert_eq!(action.payload, json!({"value": 1}));
    }

    #[test]
    fn test_extra_args_ignored() {
        let creator =
            create_async_action::<(), _, _>(TYPES, Some(pending()), None, ["value"]).unwrap();
        assert_eq!(creator.create([1, 2]).payload, json!({"value": 1}));
    }

    #[test]
    fn test_default_gate_is_true() {
        let creator =
            create_async_action::<(), _, _>(TYPES, Some(pending()), None, Vec::<String>::new())
                .unwrap();
        let action = creator.create(Vec::<Value>::new());
        let gate = action.should_call_promise.unwrap();
        assert!(gate(&()));
    }

    #[test]
    fn test_payloads_not_shared() {
        let creator =
            create_async_action::<(), _, _>(TYPES, Some(pending()), None, ["value"]).unwrap();
        let first = creator.create([1]);
        let second = creator.create([2]);

        assert_eq!(first.payload, json!({"value": 1}));
        assert_eq!(second.payload, json!({"value": 2}));
    }

    #[test]
    fn test_factory_rejects_two_types() {
        let err = create_async_action::<(), _, _>(
            ["ASYNC_REQUEST", "ASYNC_SUCCESS"],
            Some(pending()),
            None,
            Vec::<String>::new(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidTypes);
    }

    #[test]
    fn test_factory_rejects_missing_promise() {
        let err = create_async_action::<(), _, _>(TYPES, None, None, Vec::<String>::new())
            .unwrap_err();
        assert_eq!(err, ValidationError::PromiseNotCallable);
    }

    #[test]
    fn test_validate_order() {
        assert_eq!(validate_async_action(&valid()), Ok(()));

        let mut action = valid();
        action.types = vec![json!(1), json!(2), json!(3)];
        action.promise = None;
        assert_eq!(
            validate_async_action(&action),
            Err(ValidationError::InvalidTypes)
        );

        let mut action = valid();
        action.types.clear();
        assert_eq!(
            validate_async_action(&action),
            Err(ValidationError::InvalidTypes)
        );

        let mut action = valid();
        action.promise = None;
        action.should_call_promise = None;
        assert_eq!(
            validate_async_action(&action),
            Err(ValidationError::PromiseNotCallable)
        );

        let mut action = valid();
        action.should_call_promise = None;
        action.payload = Value::Null;
        assert_eq!(
            validate_async_action(&action),
            Err(ValidationError::ShouldCallPromiseNotCallable)
        );

        let mut action = valid();
        action.payload = json!([1, 2]);
        assert_eq!(
            validate_async_action(&action),
            Err(ValidationError::PayloadNotObject)
        );
    }

    #[test]
    fn test_equality_uses_identity_for_callables() {
        let action = valid();
        assert_eq!(action, action.clone());

        let other = AsyncAction::new(TYPES, pending());
        assert_ne!(action, other);
    }

    #[test]
    fn test_request_type() {
        assert_eq!(valid().request_type(), Some("ASYNC_REQUEST"));

        let mut action = valid();
        action.types.pop();
        assert_eq!(action.request_type(), None);
    }
}
