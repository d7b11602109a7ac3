//! Configuration management for the smart-home MCP gateway
//!
//! Configuration is assembled once at startup (defaults, optional config
//! file, `SMART_HOME_*` environment, then CLI flags) and is read-only for the
//! rest of the process.

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, path::PathBuf, time::Duration};
use url::Url;

/// Backend address used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Prefix of environment variables read by [`ServerConfig::load`]
pub const ENV_PREFIX: &str = "SMART_HOME";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Smart-home backend configuration
    pub backend: BackendConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Smart-home backend API configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL (e.g., "http://localhost:8000")
    pub url: Url,

    /// Bearer token; empty disables every network-backed tool
    #[serde(skip_serializing)]
    pub auth_token: String,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,

    /// Optional log file (rotated daily)
    pub file: Option<PathBuf>,

    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL
                .parse()
                .expect("default backend URL is valid"),
            auth_token: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field(
                "auth_token",
                &if self.auth_token.is_empty() {
                    "<unset>"
                } else {
                    "<redacted>"
                },
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BackendConfig {
    /// Whether a bearer token is present
    pub fn auth_token_configured(&self) -> bool {
        !self.auth_token.is_empty()
    }

    /// Normalized backend address, without the trailing slash
    ///
    /// This is the parsed URL, so the host is lowercased and a default port
    /// is dropped: `http://Home.LOCAL:80/` reads back as `http://home.local`.
    pub fn address(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Environment keys use `__` between sections, e.g.
    /// `SMART_HOME_BACKEND__URL` or `SMART_HOME_BACKEND__AUTH_TOKEN`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            if !path.exists() {
                return Err(GatewayError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        builder
            .build()
            .and_then(|settings| settings.try_deserialize::<ServerConfig>())
            .map_err(|e| GatewayError::config(format!("Failed to load configuration: {e}")))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let scheme = self.backend.url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(GatewayError::config(format!(
                "Backend URL must use http or https scheme, got '{scheme}'"
            )));
        }

        if self.backend.url.cannot_be_a_base() {
            return Err(GatewayError::config("Backend URL cannot be used as a base"));
        }

        if self.backend.timeout.is_zero() {
            return Err(GatewayError::config("Request timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Parse a backend address, adding `http://` when no scheme is given
pub fn parse_backend_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GatewayError::invalid_input("Empty backend address"));
    }

    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    with_scheme
        .parse()
        .map_err(|e| GatewayError::invalid_input(format!("Invalid backend address '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.backend.address(), DEFAULT_BACKEND_URL);
        assert!(!config.backend.auth_token_configured());
        assert_eq!(config.backend.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_never_prints_token() {
        let backend = BackendConfig {
            auth_token: "super-secret-token".to_string(),
            ..Default::default()
        };
        let printed = format!("{backend:?}");
        assert!(!printed.contains("super-secret-token"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_token_is_not_serialized() {
        let mut config = ServerConfig::default();
        config.backend.auth_token = "super-secret-token".to_string();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret-token"));
    }

    #[test]
    fn test_parse_backend_url() {
        assert_eq!(
            parse_backend_url("192.168.1.20:8000").unwrap().as_str(),
            "http://192.168.1.20:8000/"
        );
        assert_eq!(
            parse_backend_url("https://home.example.com").unwrap().scheme(),
            "https"
        );
        assert!(parse_backend_url("   ").is_err());
    }

    #[test]
    fn test_address_is_the_normalized_url() {
        let mut backend = BackendConfig::default();
        backend.url = parse_backend_url("http://Home.LOCAL:80/").unwrap();
        assert_eq!(backend.address(), "http://home.local");

        backend.url = parse_backend_url("192.168.1.20:8000/backend/").unwrap();
        assert_eq!(backend.address(), "http://192.168.1.20:8000/backend");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServerConfig::default();
        config.backend.url = "ftp://backend".parse().unwrap();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.backend.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
