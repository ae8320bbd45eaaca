//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every route forwards to [`ToolRegistry::dispatch`], so STDIO/TCP calls get
//! the same validation, timeout and result shape as HTTP calls.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};

use super::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .tools()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            let name = tool.name.to_string();
            let registry = registry.clone();

            router.with_route(ToolRoute::new_dyn(
                tool,
                move |ctx: ToolCallContext<'_, S>| {
                    let args = ctx.arguments.clone().unwrap_or_default();
                    let registry = registry.clone();
                    let name = name.clone();
                    async move {
                        registry
                            .dispatch(&name, args)
                            .await
                            .map_err(McpError::from)
                    }
                    .boxed()
                },
            ))
        })
}
