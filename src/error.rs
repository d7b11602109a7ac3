//! Error types for the smart-home MCP gateway
//!
//! Every failure the gateway can meet while talking to the backend is one of
//! these variants. Tool handlers never let them escape: they are folded into
//! the failure envelope (see [`crate::tools::ToolResponse`]).

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Error types for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Connection errors (refused, DNS, TLS)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request exceeded the configured timeout
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Other HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("HTTP status {status} for url ({url})")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Backend body was not valid JSON
    #[error("Invalid JSON in backend response: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Machine-readable error code, used for structured log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConnectionRefused,
    ConnectionTimeout,
    InvalidCredentials,
    PermissionDenied,
    NotFound,
    BackendError,
    ExternalServiceError,
    ParsingFailed,
    ConfigurationInvalid,
    InvalidInput,
    InternalError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::ConnectionRefused => 1002,
            ErrorCode::ConnectionTimeout => 1001,
            ErrorCode::InvalidCredentials => 1101,
            ErrorCode::PermissionDenied => 1103,
            ErrorCode::ConfigurationInvalid => 1202,
            ErrorCode::NotFound => 1301,
            ErrorCode::ParsingFailed => 1401,
            ErrorCode::InvalidInput => 1402,
            ErrorCode::BackendError => 1601,
            ErrorCode::ExternalServiceError => 1603,
            ErrorCode::InternalError => 1901,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1000..=1099 => "connection",
            1100..=1199 => "authentication",
            1200..=1299 => "configuration",
            1300..=1399 => "device",
            1400..=1499 => "data",
            1600..=1699 => "service",
            1900..=1999 => "internal",
            _ => "unknown",
        }
    }
}

impl GatewayError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Classify a transport failure from reqwest
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else if error.is_connect() {
            Self::connection(error.to_string())
        } else {
            Self::Http(error)
        }
    }

    /// Map to structured error code
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            GatewayError::Connection(_) => ErrorCode::ConnectionRefused,
            GatewayError::Timeout(_) => ErrorCode::ConnectionTimeout,
            GatewayError::Http(_) => ErrorCode::ExternalServiceError,
            GatewayError::Status { status, .. } => match status.as_u16() {
                401 => ErrorCode::InvalidCredentials,
                403 => ErrorCode::PermissionDenied,
                404 => ErrorCode::NotFound,
                _ => ErrorCode::BackendError,
            },
            GatewayError::Json(_) => ErrorCode::ParsingFailed,
            GatewayError::Config(_) => ErrorCode::ConfigurationInvalid,
            GatewayError::InvalidInput(_) => ErrorCode::InvalidInput,
            GatewayError::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the request hit the timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout(_))
    }

    /// Check if the backend rejected our credentials
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.to_error_code(),
            ErrorCode::InvalidCredentials | ErrorCode::PermissionDenied
        )
    }
}
