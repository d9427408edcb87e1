//! Structured fields extracted from a transcript by the model.
//!
//! The model's reply is untrusted, so every field tolerates absence and loose
//! typing:
//! - a missing or `null` key becomes an empty sequence
//! - a scalar where a sequence was expected becomes a one-element sequence
//! - scalar values are rendered as text (`null` is empty, numbers and
//!   booleans keep their JSON spelling)
//! - an action item that is not an object becomes an item whose `task` is
//!   its text

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Participants, decisions and action items for one meeting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// People who took part, in reply order
    #[serde(default, deserialize_with = "lenient_strings")]
    pub participants: Vec<String>,

    /// Decisions reached, in reply order
    #[serde(default, deserialize_with = "lenient_strings")]
    pub decisions: Vec<String>,

    /// Follow-up tasks, in reply order
    #[serde(default, deserialize_with = "lenient_action_items")]
    pub action_items: Vec<ActionItem>,
}

/// A single follow-up task. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub owner: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub task: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub deadline: String,
}

impl ActionItem {
    /// Create an action item from its three fields
    pub fn new(
        owner: impl Into<String>,
        task: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            task: task.into(),
            deadline: deadline.into(),
        }
    }
}

/// Render a JSON value as cell text
fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Normalize an optional value into a list of values
fn into_items(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_text)
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(into_items(value).into_iter().map(value_to_text).collect())
}

fn lenient_action_items<'de, D>(deserializer: D) -> Result<Vec<ActionItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    into_items(value)
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).map_err(D::Error::custom),
            other => Ok(ActionItem {
                task: value_to_text(other),
                ..Default::default()
            }),
        })
        .collect()
}
