use crate::domain;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// DTO for creating a new todo via the API. Any "id" in the body is ignored, and missing
/// or null fields fall back to an empty title and a not-done status.
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = false)]
    pub status: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            title: value.title,
            status: value.status,
        }
    }
}

/// DTO for a todo returned by the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = false)]
    pub status: bool,
}

impl From<domain::todo::Todo> for TodoItem {
    fn from(value: domain::todo::Todo) -> Self {
        TodoItem {
            id: value.id,
            title: value.title,
            status: value.status,
        }
    }
}

/// Confirmation for an operation on a single todo, keyed by the ID exactly as it appeared in
/// the request path, e.g. `{"3": "deleted successfully"}`
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
#[serde(transparent)]
pub struct TodoStatusMessage(BTreeMap<String, String>);

impl TodoStatusMessage {
    pub fn new(raw_id: &str, message: &str) -> Self {
        TodoStatusMessage(BTreeMap::from([(raw_id.to_owned(), message.to_owned())]))
    }

    #[cfg(test)]
    pub fn message_for(&self, raw_id: &str) -> Option<&str> {
        self.0.get(raw_id).map(String::as_str)
    }
}

/// Body of every failed request. Failures are still sent with HTTP 200, so clients have to
/// check for the "error" key.
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct ErrorMessage {
    #[schema(example = "todo with ID 3 does not exist")]
    pub error: String,
}
