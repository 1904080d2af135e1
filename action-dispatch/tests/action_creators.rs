//! Tests for plain action factories and async type naming

use action_dispatch::prelude::*;
use action_dispatch::create_async_action_types_with_delimiter;
use serde_json::{json, Value};

#[test]
fn test_binds_args_by_position() {
    let add_post = create_action("post/add", ["title", "body"]);
    let action = add_post.create(["Hello", "World"]);

    assert_eq!(action.action_type(), "post/add");
    assert_eq!(action.get("title"), Some(&json!("Hello")));
    assert_eq!(action.get("body"), Some(&json!("World")));
    assert_eq!(action.fields().len(), 2);
}

#[test]
fn test_extra_args_are_dropped() {
    let select = create_action("item/select", ["id"]);
    let action = select.create([json!(1), json!(2), json!(3)]);

    assert_eq!(action, Action::new("item/select").with("id", 1));
}

#[test]
fn test_missing_args_are_null() {
    let move_to = create_action("cursor/move", ["x", "y"]);
    let action = move_to.create([10]);

    assert_eq!(action.get("x"), Some(&json!(10)));
    assert_eq!(action.get("y"), Some(&Value::Null));
}

#[test]
fn test_no_arg_names() {
    let heartbeat = create_action("heartbeat", Vec::<String>::new());
    let action = heartbeat.create([json!("ignored")]);

    assert_eq!(action, Action::new("heartbeat"));
    assert!(action.fields().is_empty());
}

#[test]
fn test_creations_are_independent() {
    let add = create_action("todo/add", ["text"]);

    let first = add.create(["milk"]);
    let mut second = add.create(["milk"]);
    assert_eq!(first, second);

    second.insert("text", "eggs");
    assert_eq!(first.get("text"), Some(&json!("milk")));
    assert_eq!(second.get("text"), Some(&json!("eggs")));
}

#[test]
fn test_serializes_flat_with_type_first() {
    let action = create_action("post/add", ["title", "tags"]).create([json!("Hi"), json!(["a"])]);

    let encoded = serde_json::to_string(&action).unwrap();
    assert_eq!(encoded, r#"{"type":"post/add","title":"Hi","tags":["a"]}"#);

    let decoded: Action = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, action);
}

#[test]
fn test_async_types_default_delimiter() {
    assert_eq!(
        create_async_action_types("my/action"),
        ["my/action/request", "my/action/success", "my/action/failure"]
    );
}

#[test]
fn test_async_types_custom_delimiter() {
    assert_eq!(
        create_async_action_types_with_delimiter("my.action", "."),
        ["my.action.request", "my.action.success", "my.action.failure"]
    );
}

#[test]
fn test_async_types_empty_base() {
    assert_eq!(
        create_async_action_types(""),
        ["/request", "/success", "/failure"]
    );
}
