//! Add todo tool definition.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::TodoRecord;
use crate::core::store::Namespace;
use crate::domains::tools::definitions::common::text_result;
use crate::domains::tools::{ToolContext, ToolError, ToolRegistry};

/// Parameters for the add todo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddTodoParams {
    /// Task description to add to your todo list
    pub task: String,
}

/// Add todo tool - creates (or resets) a pending task.
pub struct AddTodoTool;

impl AddTodoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "addTodo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add a new task to your todo list";

    #[instrument(skip_all, fields(task = %params.task))]
    pub async fn execute(params: &AddTodoParams, todos: &Namespace) -> CallToolResult {
        match Self::add(&params.task, todos).await {
            Ok(()) => {
                info!("Added task");
                text_result(format!("✅ Added task: \"{}\"", params.task))
            }
            Err(e) => {
                warn!("Failed to add task: {}", e);
                text_result(format!("Error adding task: {}", e))
            }
        }
    }

    async fn add(task: &str, todos: &Namespace) -> crate::core::Result<()> {
        let record = TodoRecord::pending().to_json()?;
        todos.put(task, record).await?;
        Ok(())
    }

    pub fn register(registry: &mut ToolRegistry, context: &ToolContext) -> Result<(), ToolError> {
        let todos = Namespace::new(context.store.clone(), Namespace::TODOS);
        registry.register_typed(Self::NAME, Self::DESCRIPTION, move |params: AddTodoParams| {
            let todos = todos.clone();
            async move { Ok(Self::execute(&params, &todos).await) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::first_text;
    use crate::domains::tools::testing::{failing_store_context, test_context};

    fn params(task: &str) -> AddTodoParams {
        AddTodoParams {
            task: task.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_creates_pending_record() {
        let todos = Namespace::new(test_context().store, Namespace::TODOS);

        let result = AddTodoTool::execute(&params("Buy milk"), &todos).await;
        assert_eq!(first_text(&result), "✅ Added task: \"Buy milk\"");

        let raw = todos.get("Buy milk").await.unwrap().unwrap();
        let record = TodoRecord::from_json(&raw).unwrap();
        assert!(!record.completed);
    }

    #[tokio::test]
    async fn test_readding_resets_completed_task() {
        let todos = Namespace::new(test_context().store, Namespace::TODOS);
        let done = TodoRecord {
            completed: true,
            created_at: "2020-01-01T00:00:00.000Z".to_string(),
        };
        todos.put("Buy milk", done.to_json().unwrap()).await.unwrap();

        AddTodoTool::execute(&params("Buy milk"), &todos).await;

        let record = TodoRecord::from_json(&todos.get("Buy milk").await.unwrap().unwrap()).unwrap();
        assert!(!record.completed);
        assert_ne!(record.created_at, done.created_at);
        assert_eq!(todos.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_becomes_text() {
        let todos = Namespace::new(failing_store_context().store, Namespace::TODOS);

        let result = AddTodoTool::execute(&params("Buy milk"), &todos).await;
        assert_eq!(result.is_error, Some(false));
        assert!(first_text(&result).starts_with("Error adding task:"));
    }
}
