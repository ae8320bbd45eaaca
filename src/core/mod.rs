//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the external collaborators
//! (key-value store, randomness source), server lifecycle management and
//! transport layer abstractions.

pub mod config;
pub mod error;
pub mod randomness;
pub mod server;
pub mod store;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use randomness::{DrandClient, RandomnessSource};
pub use server::McpServer;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{TransportConfig, TransportService};
