//! MCP tool implementations for the smart-home backend
//!
//! [`DeviceGateway`] holds the read-only configuration and the backend
//! client, and implements the five tools. Every tool returns a JSON envelope
//! with a boolean `success` field; no error crosses the tool boundary.

pub mod devices;
pub mod documentation;

use crate::client::BackendHttpClient;
use crate::config::{BackendConfig, ServerConfig};
use crate::error::{GatewayError, Result};
use serde_json::{json, Map, Value};
use std::future::Future;
use tracing::{debug, warn};

pub use devices::ControlCommand;

/// Returned by network-backed tools when no bearer token is configured
pub const MISSING_TOKEN_MESSAGE: &str =
    "未配置认证令牌，请确保启动服务器时提供了--token参数";

/// Uniform tool result envelope
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Optional human-readable message
    pub message: Option<String>,

    /// Error description for failures
    pub error_details: Option<String>,

    /// Additional payload fields
    pub data: Map<String, Value>,
}

impl ToolResponse {
    /// Create successful response with payload fields
    pub fn success(data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: None,
            error_details: None,
            data,
        }
    }

    /// Create failure response
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error_details: None,
            data: Map::new(),
        }
    }

    /// Create failure response for an operation that hit an error
    pub fn from_error(operation: &str, error: &GatewayError) -> Self {
        Self {
            success: false,
            message: Some(format!("{operation}失败: {error}")),
            error_details: Some(error.to_string()),
            data: Map::new(),
        }
    }

    /// Attach a message
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach an extra payload field
    pub fn with_field<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Wrap a backend body so it always carries a boolean `success`
    ///
    /// Objects pass through unmodified unless `success` is missing, in which
    /// case `success: true` is added. Anything else lands under `data`.
    pub fn from_backend(body: Value) -> Value {
        match body {
            Value::Object(mut map) => {
                if !matches!(map.get("success"), Some(Value::Bool(_))) {
                    map.insert("success".to_string(), Value::Bool(true));
                }
                Value::Object(map)
            }
            other => json!({ "success": true, "data": other }),
        }
    }
}

impl From<ToolResponse> for Value {
    fn from(response: ToolResponse) -> Self {
        let mut map = response.data;
        map.insert("success".to_string(), Value::Bool(response.success));
        if let Some(message) = response.message {
            map.insert("message".to_string(), Value::String(message));
        }
        if let Some(details) = response.error_details {
            map.insert("error_details".to_string(), Value::String(details));
        }
        Value::Object(map)
    }
}

/// Shared tool context: configuration plus backend client
#[derive(Debug, Clone)]
pub struct DeviceGateway {
    /// Backend configuration, fixed at startup
    backend: BackendConfig,

    /// Backend HTTP client
    client: BackendHttpClient,
}

impl DeviceGateway {
    /// Create the gateway from server configuration
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            backend: config.backend.clone(),
            client: BackendHttpClient::new(&config.backend)?,
        })
    }

    /// Backend configuration in use
    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    /// `get_config` tool: never contacts the backend, never reveals the token
    pub fn get_config(&self) -> Value {
        debug!("get_config");
        ToolResponse::success(Map::new())
            .with_field(
                "config",
                json!({
                    "backend_address": self.backend.address(),
                    "auth_token_configured": self.backend.auth_token_configured(),
                }),
            )
            .into()
    }

    /// Run a backend call behind the token check and fold any error into
    /// the failure envelope
    ///
    /// `call` is only polled when a token is configured, so an unset token
    /// never reaches the network.
    pub(crate) async fn guarded<F>(&self, operation: &str, call: F) -> Value
    where
        F: Future<Output = Result<Value>>,
    {
        if !self.backend.auth_token_configured() {
            debug!("{operation}: no auth token configured, skipping backend call");
            return ToolResponse::failure(MISSING_TOKEN_MESSAGE).into();
        }

        match call.await {
            Ok(body) => ToolResponse::from_backend(body),
            Err(error) => {
                let code = error.to_error_code();
                warn!(
                    operation,
                    error_code = code.as_number(),
                    category = code.category(),
                    timed_out = error.is_timeout(),
                    auth_rejected = error.is_auth_error(),
                    "Backend call failed: {error}"
                );
                ToolResponse::from_error(operation, &error).into()
            }
        }
    }
}
