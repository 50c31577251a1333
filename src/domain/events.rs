//! Shapes shared by every event written to stdout.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Current Unix time in whole seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Event written in place of any output when a run fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub event_type: String,
    pub error: String,
    pub ts: i64,
}

impl ErrorEvent {
    pub fn new(event_type: &str, error: impl fmt::Display) -> Self {
        Self {
            event_type: event_type.to_string(),
            error: format!("{:#}", error),
            ts: unix_now(),
        }
    }

    /// Renders the event as one JSON line (without the newline).
    pub fn to_line(&self) -> String {
        serde_json::json!({
            "event_type": self.event_type,
            "error": self.error,
            "ts": self.ts,
        })
        .to_string()
    }
}

/// Field of a JSON object, or `null` when the key is absent.
pub fn field(object: &Map<String, Value>, key: &str) -> Value {
    object.get(key).cloned().unwrap_or(Value::Null)
}

/// Null-safe lookup through nested objects. Any missing or non-object step
/// yields `null`.
pub fn lookup(root: &Value, path: &[&str]) -> Value {
    path.iter()
        .try_fold(root, |node, key| node.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Loose truthiness: null, false, zero, and empty strings/arrays/objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
