//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Registration and dispatch (validation, timeout)
//! - `router.rs` - rmcp ToolRouter built from the registry for STDIO/TCP
//! - `validation.rs` - Argument checks against each tool's JSON schema
//! - `context.rs` - Injected collaborators (store, randomness source)
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a params struct deriving
//!    `Deserialize` + `JsonSchema`, an `execute()` and a `register()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Call its `register()` from `ToolRegistry::with_builtin_tools`
//!
//! Both transports pick it up from the registry.

mod context;
pub mod definitions;
mod error;
mod registry;
pub mod router;
mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use context::ToolContext;
pub use error::ToolError;
pub use registry::{ToolFuture, ToolRegistry};
pub use router::build_tool_router;
pub use validation::validate_arguments;
