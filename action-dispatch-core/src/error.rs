//! Error types for validation and dispatch

use thiserror::Error;

/// Boxed error returned by synchronous action handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why an async action descriptor was rejected.
///
/// Checks run in declaration order and the first failing one is reported,
/// so a descriptor with several problems always yields the earliest variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// `types` is not exactly three strings.
    #[error("types must contain exactly 3 string elements")]
    InvalidTypes,
    /// `promise` is missing.
    #[error("promise must be a function")]
    PromiseNotCallable,
    /// `should_call_promise` is missing.
    #[error("shouldCallPromise must be a function")]
    ShouldCallPromiseNotCallable,
    /// `payload` is not a JSON object.
    #[error("payload must be an object")]
    PayloadNotObject,
}

/// Failure while an action travels through the middleware pipeline.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An async action descriptor failed validation.
    #[error("invalid async action: {0}")]
    InvalidAsyncAction(#[from] ValidationError),

    /// A synchronous handler returned an error.
    #[error("handler for `{action_type}` failed: {source}")]
    Handler {
        /// Type of the action the handler was registered for.
        action_type: String,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },

    /// No tokio runtime was available to run a promise settlement.
    #[error("no tokio runtime available to settle `{action_type}`")]
    NoRuntime {
        /// Request type of the async action that could not be started.
        action_type: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::InvalidTypes.to_string(),
            "types must contain exactly 3 string elements"
        );
        assert_eq!(
            ValidationError::PromiseNotCallable.to_string(),
            "promise must be a function"
        );
        assert_eq!(
            ValidationError::ShouldCallPromiseNotCallable.to_string(),
            "shouldCallPromise must be a function"
        );
        assert_eq!(
            ValidationError::PayloadNotObject.to_string(),
            "payload must be an object"
        );
    }

    #[test]
    fn test_dispatch_error_from_validation() {
        let err: DispatchError = ValidationError::PayloadNotObject.into();
        assert!(matches!(
            err,
            DispatchError::InvalidAsyncAction(ValidationError::PayloadNotObject)
        ));
        assert_eq!(
            err.to_string(),
            "invalid async action: payload must be an object"
        );
    }

    #[test]
    fn test_handler_error_keeps_source() {
        use std::error::Error as _;

        let err = DispatchError::Handler {
            action_type: "post/add".into(),
            source: "boom".into(),
        };
        assert_eq!(err.to_string(), "handler for `post/add` failed: boom");
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".into()));
    }
}
