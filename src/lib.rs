//! Smart-home MCP server
//!
//! Exposes a smart-home backend API as Model Context Protocol tools:
//!
//! - `get_config`: backend address and whether a token is configured
//! - `get_device_overview`: list all devices
//! - `get_device_detail`: details of one device
//! - `control_device`: send an action with parameters to a device
//! - `get_device_type_docs`: static documentation of device types and commands
//!
//! Each network-backed tool issues exactly one HTTP request and folds every
//! failure into a `{success: false, message, error_details}` envelope.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod tools;

// Re-export main types for convenience
pub use config::ServerConfig;
pub use error::{GatewayError, Result};
pub use tools::{DeviceGateway, ToolResponse};
