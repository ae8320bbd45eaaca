//! List todos tool definition.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::TodoRecord;
use crate::core::store::Namespace;
use crate::domains::tools::definitions::common::text_result;
use crate::domains::tools::{ToolContext, ToolError, ToolRegistry};

/// Message returned when no task exists.
pub const EMPTY_LIST: &str = "No tasks found in your todo list";

/// The list todos tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTodosParams {}

/// List todos tool - renders every task as pretty-printed JSON.
pub struct ListTodosTool;

impl ListTodosTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "listTodos";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List all tasks in your todo list";

    #[instrument(skip_all)]
    pub async fn execute(todos: &Namespace) -> CallToolResult {
        match Self::collect(todos).await {
            Ok(None) => text_result(EMPTY_LIST),
            Ok(Some(rendered)) => text_result(rendered),
            Err(e) => {
                warn!("Failed to list tasks: {}", e);
                text_result(format!("Error listing tasks: {}", e))
            }
        }
    }

    /// Rendered task map, or `None` when there are no tasks.
    async fn collect(todos: &Namespace) -> crate::core::Result<Option<String>> {
        let tasks = todos.list().await?;
        if tasks.is_empty() {
            return Ok(None);
        }

        let mut rendered = Map::new();
        for (task, raw) in todos.get_many(&tasks).await? {
            // Deleted between list and fetch.
            let Some(raw) = raw else { continue };
            let value = match TodoRecord::from_json(&raw) {
                Ok(record) => serde_json::to_value(record)?,
                Err(_) => Value::String(raw),
            };
            rendered.insert(task, value);
        }

        debug!("Listing {} tasks", rendered.len());
        Ok(Some(serde_json::to_string_pretty(&rendered)?))
    }

    pub fn register(registry: &mut ToolRegistry, context: &ToolContext) -> Result<(), ToolError> {
        let todos = Namespace::new(context.store.clone(), Namespace::TODOS);
        registry.register_typed(Self::NAME, Self::DESCRIPTION, move |_: ListTodosParams| {
            let todos = todos.clone();
            async move { Ok(Self::execute(&todos).await) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::first_text;
    use crate::domains::tools::definitions::todo::{AddTodoParams, AddTodoTool};
    use crate::domains::tools::testing::{failing_store_context, test_context};

    #[tokio::test]
    async fn test_empty_list() {
        let todos = Namespace::new(test_context().store, Namespace::TODOS);
        let result = ListTodosTool::execute(&todos).await;
        assert_eq!(first_text(&result), "No tasks found in your todo list");
    }

    #[tokio::test]
    async fn test_lists_added_tasks() {
        let todos = Namespace::new(test_context().store, Namespace::TODOS);
        for task in ["Write report", "Buy milk"] {
            AddTodoTool::execute(&AddTodoParams { task: task.to_string() }, &todos).await;
        }

        let text = first_text(&ListTodosTool::execute(&todos).await);
        let parsed: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed["Buy milk"]["completed"], false);
        assert_eq!(parsed["Write report"]["completed"], false);
        assert!(parsed["Buy milk"]["createdAt"].is_string());
        // Pretty-printed with two-space indentation.
        assert!(text.contains("\n  \"Buy milk\": {"));
    }

    #[tokio::test]
    async fn test_foreign_values_are_shown_raw() {
        let todos = Namespace::new(test_context().store, Namespace::TODOS);
        todos.put("legacy", "not a record".to_string()).await.unwrap();

        let text = first_text(&ListTodosTool::execute(&todos).await);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["legacy"], "not a record");
    }

    #[tokio::test]
    async fn test_stored_values_are_not_tasks() {
        let context = test_context();
        let values = Namespace::new(context.store.clone(), Namespace::VALUES);
        values.put("theme", "dark".to_string()).await.unwrap();

        let todos = Namespace::new(context.store, Namespace::TODOS);
        let result = ListTodosTool::execute(&todos).await;
        assert_eq!(first_text(&result), EMPTY_LIST);
    }

    #[tokio::test]
    async fn test_store_failure_becomes_text() {
        let todos = Namespace::new(failing_store_context().store, Namespace::TODOS);
        let result = ListTodosTool::execute(&todos).await;
        assert!(first_text(&result).starts_with("Error listing tasks:"));
    }
}
