//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! the tools domain, the backing collaborators and external dependencies,
//! providing consistent error handling across the entire application.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the key-value store.
    #[error("Store error: {0}")]
    Store(#[from] super::store::StoreError),

    /// Error originating from the randomness source.
    #[error("Randomness error: {0}")]
    Randomness(#[from] super::randomness::RandomnessError),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_tool_error_converts() {
        let err: Error = ToolError::not_found("nope").into();
        assert_eq!(err.to_string(), "Tool error: Tool not found: nope");
    }

    #[test]
    fn test_store_error_converts() {
        let err: Error = super::super::store::StoreError::unavailable("offline").into();
        assert!(err.to_string().starts_with("Store error:"));
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_corrupt_record_converts() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
