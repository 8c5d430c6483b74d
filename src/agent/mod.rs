//! Agent-tool interface.
//!
//! Exposes the event search to orchestrating agents over the Model Context
//! Protocol (JSON-RPC 2.0).

pub mod json_rpc;
pub mod mcp;
pub mod tools;

pub use mcp::McpHandler;
