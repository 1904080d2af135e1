//! Plain actions and the positional action factory

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named values attached to an action or an async action, in insertion order.
pub type Payload = Map<String, Value>;

/// Field name holding the action type.
pub const TYPE_FIELD: &str = "type";

/// A plain action: a `type` plus zero or more named fields.
///
/// Serializes to a flat JSON object with `type` first:
///
/// ```
/// use action_dispatch_core::Action;
/// use serde_json::json;
///
/// let action = Action::new("post/add").with("title", "New post");
/// assert_eq!(
///     serde_json::to_value(&action).unwrap(),
///     json!({ "type": "post/add", "title": "New post" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(flatten)]
    fields: Payload,
}

impl Action {
    /// Create an action with no fields.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            fields: Payload::new(),
        }
    }

    /// Create an action and spread `fields` into it.
    ///
    /// Equivalent to `{ type, ...fields }`: a string `type` entry in `fields`
    /// overrides `action_type`.
    pub fn with_fields(action_type: impl Into<String>, fields: Payload) -> Self {
        let mut action = Self::new(action_type);
        for (name, value) in fields {
            action.insert(name, value);
        }
        action
    }

    /// The action type.
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// All fields except `type`.
    pub fn fields(&self) -> &Payload {
        &self.fields
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field, replacing any previous value under the same name.
    ///
    /// `type` is reserved: a string value replaces the action type and any
    /// other value is dropped.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if name != TYPE_FIELD {
            self.fields.insert(name, value);
            return;
        }
        match value {
            Value::String(action_type) => self.action_type = action_type,
            other => tracing::warn!(
                action = %self.action_type,
                value = %other,
                "ignoring non-string `type` field"
            ),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Split into the type and the fields.
    pub fn into_parts(self) -> (String, Payload) {
        (self.action_type, self.fields)
    }
}

/// Factory for plain actions with positionally bound fields.
///
/// Created with [`create_action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCreator {
    action_type: String,
    arg_names: Vec<String>,
}

impl ActionCreator {
    /// The type every created action carries.
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Field names, in binding order.
    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    /// Build an action, binding `args[i]` to `arg_names[i]`.
    ///
    /// Extra arguments are ignored; missing ones become `null`.
    pub fn create<I>(&self, args: I) -> Action
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Action::with_fields(
            self.action_type.clone(),
            bind_positional(&self.arg_names, args),
        )
    }
}

/// Create an action factory.
///
/// # Example
///
/// ```
/// use action_dispatch_core::create_action;
/// use serde_json::json;
///
/// let heartbeat = create_action("heartbeat", Vec::<String>::new());
/// assert_eq!(heartbeat.create(Vec::<i32>::new()).action_type(), "heartbeat");
///
/// let add_post = create_action("post/add", ["title"]);
/// let action = add_post.create(["New post"]);
/// assert_eq!(action.get("title"), Some(&json!("New post")));
/// ```
pub fn create_action<N>(action_type: impl Into<String>, arg_names: N) -> ActionCreator
where
    N: IntoIterator,
    N::Item: Into<String>,
{
    ActionCreator {
        action_type: action_type.into(),
        arg_names: arg_names.into_iter().map(Into::into).collect(),
    }
}

/// Zip names with positional arguments into a fresh payload.
pub(crate) fn bind_positional<I>(names: &[String], args: I) -> Payload
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let mut args = args.into_iter();
    let mut payload = Payload::new();
    for name in names {
        let value = args.next().map(Into::into).unwrap_or(Value::Null);
        payload.insert(name.clone(), value);
    }
    payload
}
