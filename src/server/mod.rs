//! Server module for MCP components
//!
//! This module contains the macro-based MCP server.

pub mod macro_backend;

pub use macro_backend::{SmartHomeMcpServer, SERVER_NAME};
