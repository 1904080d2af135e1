//! Promise runner: request, call, then success or failure

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::action::{Action, Payload};
use crate::async_action::AsyncAction;
use crate::error::DispatchError;
use crate::store::Dispatcher;

/// Field carrying the resolved value on the success action.
pub const RESPONSE_FIELD: &str = "response";

/// Field carrying the rejected value on the failure action.
pub const ERROR_FIELD: &str = "error";

/// Future that waits for the promise and dispatches success or failure.
pub type Settlement = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Call an async action's promise and dispatch the sub actions.
///
/// Before returning this:
/// 1. validates `action`,
/// 2. dispatches `{ type: request, ...payload }`,
/// 3. calls `promise` with the payload values in insertion order.
///
/// The returned [`Settlement`] does the rest once awaited: exactly one of
/// `{ type: success, ...payload, response }` or
/// `{ type: failure, ...payload, error }` is dispatched.
///
/// A panic inside `promise` while it builds its future is not caught.
///
/// # Example
///
/// ```ignore
/// let settlement = call_promise(Dispatcher::from_store(store.clone()), &action)?;
/// tokio::spawn(settlement);
/// ```
pub fn call_promise<S: 'static>(
    dispatcher: Dispatcher<S>,
    action: &AsyncAction<S>,
) -> Result<Settlement, DispatchError> {
    let checked = action.checked()?;
    let [request, success, failure] = checked.types.map(str::to_owned);
    let payload = checked.payload.clone();

    tracing::debug!(action = %request, "dispatching async request");
    dispatcher.dispatch(Action::with_fields(request, payload.clone()))?;

    let pending = (checked.promise)(payload.values().cloned().collect());

    Ok(Box::pin(async move {
        let settled = match pending.await {
            Ok(response) => with_field(success, payload, RESPONSE_FIELD, response),
            Err(error) => with_field(failure, payload, ERROR_FIELD, error),
        };

        let action_type = settled.action_type().to_owned();
        tracing::debug!(action = %action_type, "async action settled");
        if let Err(err) = dispatcher.dispatch(settled) {
            tracing::warn!(action = %action_type, error = %err, "settlement dispatch failed");
        }
    }))
}

fn with_field(action_type: String, payload: Payload, name: &str, value: Value) -> Action {
    Action::with_fields(action_type, payload).with(name, value)
}
