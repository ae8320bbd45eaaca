//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - Registration of tools with their schema and handler
//! - Dispatch with schema validation and a per-call timeout
//! - Tool metadata for listing
//!
//! Both transports go through [`ToolRegistry::dispatch`]: the HTTP handler
//! calls it directly and the rmcp router built in `router.rs` wraps it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::definitions::{
    AddTodoTool, AddTool, CalculateTool, CompleteTodoTool, ListTodosTool, RandomNumberTool,
    StoreValueTool,
};
use super::validation::validate_arguments;
use super::{ToolContext, ToolError};
use crate::core::config::Config;

/// Future returned by a tool handler.
pub type ToolFuture = BoxFuture<'static, Result<CallToolResult, ToolError>>;

type Handler = Arc<dyn Fn(JsonObject) -> ToolFuture + Send + Sync>;

struct RegisteredTool {
    tool: Tool,
    handler: Handler,
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Tools are registered once at startup and the registry is immutable
/// afterwards (it is shared behind an `Arc`).
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    call_timeout: Duration,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            tools: Vec::new(),
            call_timeout,
        }
    }

    /// Create a registry holding every built-in tool.
    pub fn with_builtin_tools(config: &Config, context: &ToolContext) -> Result<Self, ToolError> {
        let mut registry = Self::new(Duration::from_secs(config.tools.call_timeout_secs));

        AddTool::register(&mut registry)?;
        RandomNumberTool::register(&mut registry, context)?;
        CalculateTool::register(&mut registry)?;
        StoreValueTool::register(&mut registry, context)?;
        AddTodoTool::register(&mut registry, context)?;
        ListTodosTool::register(&mut registry, context)?;
        CompleteTodoTool::register(&mut registry, context)?;

        info!("Registered {} tools", registry.len());
        Ok(registry)
    }

    /// Register a tool with a raw handler receiving the JSON arguments.
    pub fn register<F>(&mut self, tool: Tool, handler: F) -> Result<(), ToolError>
    where
        F: Fn(JsonObject) -> ToolFuture + Send + Sync + 'static,
    {
        if self.get(&tool.name).is_some() {
            return Err(ToolError::Duplicate(tool.name.to_string()));
        }

        debug!("Registering tool: {}", tool.name);
        self.tools.push(RegisteredTool {
            tool,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Register a tool whose schema is derived from its parameter type.
    ///
    /// Arguments are deserialized into `P` before the handler runs.
    pub fn register_typed<P, F, Fut>(
        &mut self,
        name: &'static str,
        description: &'static str,
        handler: F,
    ) -> Result<(), ToolError>
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, ToolError>> + Send + 'static,
    {
        let tool = Tool {
            name: name.into(),
            description: Some(description.into()),
            input_schema: cached_schema_for_type::<P>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        };

        let handler = Arc::new(handler);
        self.register(tool, move |args| {
            let handler = handler.clone();
            async move {
                let params: P = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
                handler(params).await
            }
            .boxed()
        })
    }

    /// Look up a tool's metadata by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().map(|t| &t.tool).find(|t| t.name == name)
    }

    /// Get all tools as Tool models, in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.tool.name.as_ref()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate arguments and invoke the named tool.
    ///
    /// The handler's result is returned unchanged. Unknown tools, schema
    /// violations and timeouts are reported as [`ToolError`]s.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let Some(entry) = self.tools.iter().find(|t| t.tool.name == name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        if let Err(e) = validate_arguments(&entry.tool.input_schema, &arguments) {
            warn!("Rejected arguments for {}: {}", name, e);
            return Err(e);
        }

        match tokio::time::timeout(self.call_timeout, (entry.handler)(arguments)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Tool {} timed out after {:?}", name, self.call_timeout);
                Err(ToolError::Timeout)
            }
        }
    }
}
