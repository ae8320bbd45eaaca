//! Calculator tool definition.
//!
//! Four operations over two operands. Dividing by zero is answered with an
//! explanatory text result rather than a protocol error.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::super::common::{format_number, text_result};
use crate::domains::tools::{ToolError, ToolRegistry};

/// Message returned for a zero divisor.
pub const DIVIDE_BY_ZERO: &str = "Error: Cannot divide by zero";

/// Supported arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Apply the operation; `None` when the divisor is zero.
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Self::Add => Some(a + b),
            Self::Subtract => Some(a - b),
            Self::Multiply => Some(a * b),
            Self::Divide if b == 0.0 => None,
            Self::Divide => Some(a / b),
        }
    }
}

/// Parameters for the calculate tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculateParams {
    /// Mathematical operation to perform
    pub operation: Operation,

    /// First operand
    pub a: f64,

    /// Second operand
    pub b: f64,
}

/// Calculate tool - add, subtract, multiply or divide two numbers.
pub struct CalculateTool;

impl CalculateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculate";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Perform various mathematical operations on two numbers";

    #[instrument(skip_all, fields(operation = ?params.operation))]
    pub fn execute(params: &CalculateParams) -> CallToolResult {
        match params.operation.apply(params.a, params.b) {
            Some(value) => text_result(format_number(value)),
            None => {
                debug!("Refusing to divide {} by zero", params.a);
                text_result(DIVIDE_BY_ZERO)
            }
        }
    }

    pub fn register(registry: &mut ToolRegistry) -> Result<(), ToolError> {
        registry.register_typed(
            Self::NAME,
            Self::DESCRIPTION,
            |params: CalculateParams| async move { Ok(Self::execute(&params)) },
        )
    }
}
