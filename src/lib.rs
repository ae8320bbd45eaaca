//! World Tools MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server exposing a small
//! set of tools: arithmetic, drand-backed random numbers, a key-value store
//! and a todo list.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Infrastructure including configuration, error handling, the
//!   server handler, transports and the external collaborators (key-value
//!   store, randomness source)
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: MCP tools that can be executed by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use world_tools_mcp::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::from_config(config).await?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
