//! Complete todo tool definition.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::TodoRecord;
use crate::core::store::Namespace;
use crate::domains::tools::definitions::common::text_result;
use crate::domains::tools::{ToolContext, ToolError, ToolRegistry};

/// Parameters for the complete todo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompleteTodoParams {
    /// The task to mark as completed
    pub task: String,
}

enum Outcome {
    Completed,
    NotFound,
}

/// Complete todo tool - marks an existing task as done.
pub struct CompleteTodoTool;

impl CompleteTodoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "completeTodo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Mark a task as completed in your todo list";

    #[instrument(skip_all, fields(task = %params.task))]
    pub async fn execute(params: &CompleteTodoParams, todos: &Namespace) -> CallToolResult {
        match Self::complete(&params.task, todos).await {
            Ok(Outcome::Completed) => {
                info!("Task completed");
                text_result(format!("✅ Marked task \"{}\" as completed", params.task))
            }
            Ok(Outcome::NotFound) => text_result(format!("Task \"{}\" not found", params.task)),
            Err(e) => {
                warn!("Failed to complete task: {}", e);
                text_result(format!("Error completing task: {}", e))
            }
        }
    }

    async fn complete(task: &str, todos: &Namespace) -> crate::core::Result<Outcome> {
        let Some(raw) = todos.get(task).await? else {
            return Ok(Outcome::NotFound);
        };

        let mut record = TodoRecord::from_json(&raw)?;
        record.completed = true;
        todos.put(task, record.to_json()?).await?;
        Ok(Outcome::Completed)
    }

    pub fn register(registry: &mut ToolRegistry, context: &ToolContext) -> Result<(), ToolError> {
        let todos = Namespace::new(context.store.clone(), Namespace::TODOS);
        registry.register_typed(Self::NAME, Self::DESCRIPTION, move |params: CompleteTodoParams| {
            let todos = todos.clone();
            async move { Ok(Self::execute(&params, &todos).await) }
        })
    }
}
