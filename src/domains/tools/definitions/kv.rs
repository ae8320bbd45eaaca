//! Store value tool definition.
//!
//! Unlike the other tools, a store failure here is not folded into a text
//! result: it is returned as an error and surfaces as a protocol error.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::common::text_result;
use crate::core::store::Namespace;
use crate::domains::tools::{ToolContext, ToolError, ToolRegistry};

/// Parameters for the store value tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StoreValueParams {
    /// Key to store the value under
    pub key: String,

    /// Value to store
    pub value: String,
}

/// Store value tool - writes a raw string into the key-value store.
pub struct StoreValueTool;

impl StoreValueTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "storeValue";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Store a simple key-value pair in Cloudflare KV";

    #[instrument(skip_all, fields(key = %params.key))]
    pub async fn execute(
        params: &StoreValueParams,
        values: &Namespace,
    ) -> Result<CallToolResult, ToolError> {
        values
            .put(&params.key, params.value.clone())
            .await
            .map_err(|e| {
                warn!("Failed to store '{}': {}", params.key, e);
                ToolError::execution_failed(format!("Failed to store value: {}", e))
            })?;

        info!("Stored value under '{}'", params.key);
        Ok(text_result("Value stored successfully"))
    }

    pub fn register(registry: &mut ToolRegistry, context: &ToolContext) -> Result<(), ToolError> {
        let values = Namespace::new(context.store.clone(), Namespace::VALUES);
        registry.register_typed(Self::NAME, Self::DESCRIPTION, move |params: StoreValueParams| {
            let values = values.clone();
            async move { Self::execute(&params, &values).await }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::first_text;
    use crate::domains::tools::testing::{failing_store_context, test_context};

    fn params(key: &str, value: &str) -> StoreValueParams {
        StoreValueParams {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_value() {
        let context = test_context();
        let values = Namespace::new(context.store.clone(), Namespace::VALUES);

        let result = StoreValueTool::execute(&params("color", "blue"), &values)
            .await
            .unwrap();
        assert_eq!(first_text(&result), "Value stored successfully");
        assert_eq!(values.get("color").await.unwrap().as_deref(), Some("blue"));
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let context = failing_store_context();
        let values = Namespace::new(context.store.clone(), Namespace::VALUES);

        let err = StoreValueTool::execute(&params("color", "blue"), &values)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
        assert!(err.to_string().contains("Failed to store value"));
        assert!(err.to_string().contains("write quota exceeded"));
    }

    #[tokio::test]
    async fn test_store_value_does_not_touch_todos() {
        let context = test_context();
        let values = Namespace::new(context.store.clone(), Namespace::VALUES);
        let todos = Namespace::new(context.store.clone(), Namespace::TODOS);

        StoreValueTool::execute(&params("buy milk", "raw"), &values)
            .await
            .unwrap();
        assert!(todos.get("buy milk").await.unwrap().is_none());
        assert!(todos.list().await.unwrap().is_empty());
    }
}
