//! Todo list tools.
//!
//! Tasks are keyed by their description text, so adding the same text twice
//! replaces the earlier entry. A task moves `absent -> pending -> completed`
//! and is never removed.

pub mod add;
pub mod complete;
pub mod list;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub use add::{AddTodoParams, AddTodoTool};
pub use complete::{CompleteTodoParams, CompleteTodoTool};
pub use list::{ListTodosParams, ListTodosTool};

/// Persisted state of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub completed: bool,

    /// Creation time, RFC 3339 in UTC with millisecond precision.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl TodoRecord {
    /// A fresh pending task stamped with the current time.
    pub fn pending() -> Self {
        Self {
            completed: false,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
