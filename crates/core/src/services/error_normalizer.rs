use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientError;

/// The `detail` field of a failure body, resolved once into one of the two
/// shapes the ledger service produces.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureDetail {
    /// `{"detail": "Insufficient funds"}`
    Message(String),
    /// `{"detail": [{"loc": [...], "msg": "...", "type": "..."}, ...]}`
    Issues(Vec<ValidationIssue>),
}

/// One entry of a structured validation failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub msg: String,

    #[serde(default)]
    pub loc: Vec<Value>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl FailureDetail {
    /// Parse a raw failure body. Returns `None` for anything that is not JSON
    /// or whose `detail` is neither a string nor an array.
    pub fn from_body(body: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(body).ok()?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value.get("detail")? {
            Value::String(message) => Some(FailureDetail::Message(message.clone())),
            Value::Array(items) => Some(FailureDetail::Issues(
                items
                    .iter()
                    .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Display text for this detail. An empty issue list, or one whose
    /// issues carry no `msg`, has nothing to say.
    pub fn message(&self) -> Option<String> {
        match self {
            FailureDetail::Message(message) => Some(message.clone()),
            FailureDetail::Issues(issues) => Some(
                issues
                    .iter()
                    .map(|issue| issue.msg.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .filter(|joined| !joined.is_empty()),
        }
    }
}

/// Turn any failure into the single string shown in the banner.
///
/// Precedence: a string `detail` verbatim, then the `msg` of every
/// validation issue joined with `", "`, then `default_message`.
pub fn normalize(error: &ClientError, default_message: &str) -> String {
    error
        .detail()
        .and_then(FailureDetail::message)
        .unwrap_or_else(|| default_message.to_string())
}

