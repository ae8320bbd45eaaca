//! Addition tool definition.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use super::super::common::{format_number, text_result};
use crate::domains::tools::{ToolError, ToolRegistry};

/// Parameters for the add tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddParams {
    /// First number to add
    pub a: f64,

    /// Second number to add
    pub b: f64,
}

/// Add tool - sums two numbers.
pub struct AddTool;

impl AddTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Simple addition of two numbers";

    pub fn execute(params: &AddParams) -> CallToolResult {
        debug!("add({}, {})", params.a, params.b);
        text_result(format_number(params.a + params.b))
    }

    pub fn register(registry: &mut ToolRegistry) -> Result<(), ToolError> {
        registry.register_typed(Self::NAME, Self::DESCRIPTION, |params: AddParams| async move {
            Ok(Self::execute(&params))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::first_text;

    #[test]
    fn test_add_integers() {
        let result = AddTool::execute(&AddParams { a: 2.0, b: 3.0 });
        assert_eq!(first_text(&result), "5");
    }

    #[test]
    fn test_add_negative_and_fractional() {
        let result = AddTool::execute(&AddParams { a: -1.5, b: 0.25 });
        assert_eq!(first_text(&result), "-1.25");
    }

    #[test]
    fn test_add_is_never_an_error() {
        let result = AddTool::execute(&AddParams { a: f64::MAX, b: f64::MAX });
        assert_eq!(result.is_error, Some(false));
        assert_eq!(first_text(&result), "Infinity");
    }
}
