//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tool registry.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` and registered in
//! `ToolRegistry::with_builtin_tools`. The rmcp `ToolRouter` used by the
//! STDIO/TCP transports is built from that registry, and the HTTP transport
//! calls the registry directly, so both paths share one dispatcher.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{ToolContext, ToolError, ToolRegistry, build_tool_router};

/// Instructions advertised to clients on initialize.
pub const INSTRUCTIONS: &str = "A collection of useful tools including a true random number \
     generator powered by drand, a calculator, a key-value store and a todo list.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and is also
/// used directly by the HTTP transport.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry and dispatcher for every tool.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration and collaborators.
    pub fn new(config: Config, context: ToolContext) -> crate::core::Result<Self> {
        let registry = Arc::new(ToolRegistry::with_builtin_tools(&config, &context)?);

        Ok(Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            registry,
        })
    }

    /// Create a server wired to the collaborators described by `config`.
    pub async fn from_config(config: Config) -> crate::core::Result<Self> {
        let context = ToolContext::from_config(&config).await?;
        Self::new(config, context)
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// `arguments` must be a JSON object or null.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            _ => {
                return Err(ToolError::invalid_arguments(
                    "arguments must be a JSON object",
                ));
            }
        };

        let result = self.registry.dispatch(name, arguments).await?;
        serde_json::to_value(&result).map_err(|e| ToolError::internal(e.to_string()))
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::test_context;
    use serde_json::json;

    fn test_server() -> McpServer {
        McpServer::new(Config::default(), test_context()).unwrap()
    }

    #[test]
    fn test_list_tools_shape() {
        let tools = test_server().list_tools();
        assert_eq!(tools.len(), 7);

        let calculate = tools.iter().find(|t| t["name"] == "calculate").unwrap();
        assert_eq!(
            calculate["description"],
            "Perform various mathematical operations on two numbers"
        );
        assert!(calculate["inputSchema"]["properties"]["operation"].is_object());
    }

    #[test]
    fn test_get_info_advertises_tools_only() {
        let info = test_server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[tokio::test]
    async fn test_call_tool_serializes_result() {
        let value = test_server()
            .call_tool("calculate", json!({ "operation": "divide", "a": 1, "b": 0 }))
            .await
            .unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "Error: Cannot divide by zero");
    }

    #[tokio::test]
    async fn test_call_tool_null_arguments() {
        let value = test_server()
            .call_tool("listTodos", serde_json::Value::Null)
            .await
            .unwrap();
        assert_eq!(value["content"][0]["text"], "No tasks found in your todo list");
    }

    #[tokio::test]
    async fn test_call_tool_rejects_non_object_arguments() {
        let err = test_server()
            .call_tool("add", json!([1, 2]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
