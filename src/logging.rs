//! Logging setup for the stdio MCP server
//!
//! stdout carries the MCP stream, so console output always goes to stderr.
//! An optional log file is rotated daily.

use crate::config::LoggingConfig;
use crate::error::{GatewayError, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with the given configuration
///
/// `debug` forces the `debug` level regardless of `RUST_LOG`. The returned
/// guard must be kept alive for the file writer to flush.
pub fn init_logging(config: &LoggingConfig, debug: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let text_layer = (!config.json).then(|| {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
    });
    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    let (file_layer, guard) = match &config.file {
        Some(file_path) => {
            let directory = file_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(directory)?;

            let file_name = file_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("smart-home-mcp.log"));
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| GatewayError::config(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}

/// Logging helpers for MCP tool calls
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    /// Log tool invocation
    pub fn log_tool_call(tool_name: &str, params: &serde_json::Value) {
        let sanitized_params = Self::sanitize_params(params);

        tracing::debug!(
            tool = tool_name,
            params = %sanitized_params,
            "MCP tool called"
        );
    }

    /// Log tool response
    ///
    /// Backend failures get their `warn` line from the gateway, not here.
    pub fn log_tool_response(tool_name: &str, duration_ms: u64, response: &serde_json::Value) {
        let success = response
            .get("success")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        tracing::debug!(
            tool = tool_name,
            duration_ms = duration_ms,
            success = success,
            message = response.get("message").and_then(|m| m.as_str()).unwrap_or(""),
            "MCP tool completed"
        );
    }

    /// Replace values of sensitive keys with `***`
    pub fn sanitize_params(params: &serde_json::Value) -> serde_json::Value {
        match params {
            serde_json::Value::Object(map) => {
                let sanitized = map
                    .iter()
                    .map(|(key, value)| {
                        let value = if Self::is_sensitive_field(key) {
                            serde_json::Value::String("***".to_string())
                        } else {
                            Self::sanitize_params(value)
                        };
                        (key.clone(), value)
                    })
                    .collect();
                serde_json::Value::Object(sanitized)
            }
            serde_json::Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::sanitize_params).collect())
            }
            other => other.clone(),
        }
    }

    fn is_sensitive_field(key: &str) -> bool {
        let key = key.to_lowercase();
        ["token", "password", "secret", "authorization", "code", "pin"]
            .iter()
            .any(|needle| key.contains(needle))
    }
}
