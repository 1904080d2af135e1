//! Tests for handler middleware, composition and logging through a Store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use action_dispatch::prelude::*;
use action_dispatch::testing::{action_types, TestHarness};
use action_dispatch::{assert_dispatched, assert_not_dispatched, count_dispatched, HandlerError};

#[derive(Debug, Clone, Default, PartialEq)]
struct Blog {
    posts: Vec<String>,
    cache_clears: usize,
}

fn reducer(state: &mut Blog, action: &Action) -> bool {
    match action.action_type() {
        "post/add" => {
            let title = action
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            state.posts.push(title.to_owned());
            true
        }
        "cache/clear" => {
            state.cache_clears += 1;
            true
        }
        _ => false,
    }
}

/// Records the action types it sees, tagged with its own name
struct Tap {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Middleware<Blog> for Tap {
    fn handle(
        &self,
        _store: &StoreRef<Blog>,
        action: Dispatched<Blog>,
        next: action_dispatch::Next<'_, Blog>,
    ) -> DispatchResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, action.name()));
        next(action)
    }
}

#[test]
fn test_handler_sees_state_action_and_dispatch() {
    let harness = TestHarness::new(Blog {
        posts: vec!["first".into()],
        cache_clears: 0,
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in = calls.clone();
    let middleware = create_middleware([(
        "post/add",
        handler(move |state: &Blog, action: &Action, dispatch: &Dispatcher<Blog>| {
            calls_in.fetch_add(1, Ordering::SeqCst);
            assert_eq!(state.posts, vec!["first".to_owned()]);
            assert_eq!(action.get("title").and_then(|v| v.as_str()), Some("second"));
            dispatch.dispatch(Action::new("cache/clear"))?;
            Ok(())
        }),
    )]);

    let add_post = create_action("post/add", ["title"]);
    harness.invoke(&middleware, add_post.create(["second"])).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.get_state_calls(), 1);
    assert_eq!(action_types(&harness.drain_dispatched()), vec!["cache/clear"]);

    let forwarded = harness.drain_forwarded();
    assert_eq!(forwarded, vec![Dispatched::Action(add_post.create(["second"]))]);
}

#[test]
fn test_unmatched_type_skips_handlers() {
    let harness = TestHarness::new(Blog::default());
    let middleware = HandlerMiddleware::new().on(
        "post/add",
        |_: &Blog, _: &Action, _: &Dispatcher<Blog>| -> Result<(), HandlerError> {
            panic!("handler must not run")
        },
    );

    harness
        .invoke(&middleware, Action::new("post/remove"))
        .unwrap();

    assert_eq!(harness.get_state_calls(), 0);
    let forwarded = harness.drain_forwarded();
    assert_dispatched!(forwarded, Dispatched::Action(a) if a.action_type() == "post/remove");
}

#[test]
fn test_async_descriptor_never_matches_handler() {
    let harness = TestHarness::new(Blog::default());
    let middleware = HandlerMiddleware::new().on(
        "post/fetch/request",
        |_: &Blog, _: &Action, _: &Dispatcher<Blog>| -> Result<(), HandlerError> {
            Err("should not run".into())
        },
    );
    let action = AsyncAction::<Blog>::new(
        create_async_action_types("post/fetch"),
        promise_fn(|_| async { Ok(serde_json::Value::Null) }),
    );

    harness.invoke(&middleware, action).unwrap();

    let forwarded = harness.drain_forwarded();
    assert_eq!(count_dispatched!(forwarded, Dispatched::Async(_)), 1);
    assert!(harness.drain_dispatched().is_empty());
}

#[test]
fn test_store_runs_handler_before_reducer() {
    let middleware = HandlerMiddleware::new().on(
        "post/add",
        |state: &Blog, _: &Action, dispatch: &Dispatcher<Blog>| {
            // the reducer has not seen the new post yet
            if state.posts.is_empty() {
                dispatch.dispatch(Action::new("cache/clear"))?;
            }
            Ok(())
        },
    );
    let store = Store::with_middleware(Blog::default(), reducer, middleware);
    let add_post = create_action("post/add", ["title"]);

    assert!(store.dispatch(add_post.create(["hello"])).unwrap());
    assert!(store.dispatch(add_post.create(["again"])).unwrap());

    assert_eq!(
        store.state(),
        Blog {
            posts: vec!["hello".into(), "again".into()],
            cache_clears: 1,
        }
    );
}

#[test]
fn test_handler_error_leaves_state_untouched() {
    let middleware = HandlerMiddleware::new().on(
        "post/add",
        |_: &Blog, _: &Action, _: &Dispatcher<Blog>| Err("read only".into()),
    );
    let store = Store::with_middleware(Blog::default(), reducer, middleware);

    let err = store
        .dispatch(Action::new("post/add").with("title", "nope"))
        .unwrap_err();

    assert_eq!(err.to_string(), "handler for `post/add` failed: read only");
    assert!(store.state().posts.is_empty());
}

#[test]
fn test_composed_runs_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = ComposedMiddleware::new()
        .with(Tap {
            name: "outer",
            log: log.clone(),
        })
        .with(LoggingMiddleware::verbose())
        .with(Tap {
            name: "inner",
            log: log.clone(),
        });
    assert_eq!(chain.len(), 3);

    let store = Store::with_middleware(Blog::default(), reducer, chain);
    store.dispatch(Action::new("cache/clear")).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["outer:cache/clear", "inner:cache/clear"]
    );
    assert_eq!(store.state().cache_clears, 1);
}

#[test]
fn test_logging_filter_does_not_change_flow() {
    let filter = ActionLoggerConfig::new(Some("post/*"), Some("*/request"));
    let middleware = LoggingMiddleware::new().with_filter(filter);
    let harness = TestHarness::new(Blog::default());

    harness.invoke(&middleware, Action::new("cache/clear")).unwrap();
    harness.invoke(&middleware, Action::new("post/add")).unwrap();

    let forwarded = harness.drain_forwarded();
    assert_eq!(action_types(&forwarded), vec!["cache/clear", "post/add"]);
    assert_not_dispatched!(forwarded, Dispatched::Async(_));
}
