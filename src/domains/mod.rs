//! Domains module containing business logic organized by bounded contexts.
//!
//! The server exposes a single domain: tools callable by MCP clients.

pub mod tools;
