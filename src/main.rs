//! Smart-home MCP Server - Main Entry Point
//!
//! Serves the device tools over stdio. Configuration precedence:
//! defaults < `--config` file < `SMART_HOME_*` environment < CLI flags.

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use smart_home_mcp::{
    config::parse_backend_url, logging::init_logging, server::SmartHomeMcpServer, DeviceGateway,
    ServerConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Smart-home MCP Server Configuration
#[derive(Parser, Debug)]
#[command(name = "smart-home-mcp-server")]
#[command(about = "MCP server for smart-home device listing, detail and control")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Backend API address (default: http://localhost:8000)
    #[arg(long)]
    backend: Option<String>,

    /// Bearer token for the backend API
    #[arg(long)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Also write logs to this file (rotated daily)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// Merge CLI flags over file and environment configuration
    fn resolve_config(&self) -> smart_home_mcp::Result<ServerConfig> {
        let mut config = ServerConfig::load(self.config.as_deref())?;

        if let Some(backend) = &self.backend {
            config.backend.url = parse_backend_url(backend)?;
        }
        if let Some(token) = &self.token {
            config.backend.auth_token = token.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.backend.timeout = Duration::from_secs(secs);
        }
        if self.log_file.is_some() {
            config.logging.file = self.log_file.clone();
        }
        if self.log_json {
            config.logging.json = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let _log_guard = init_logging(&config.logging, cli.debug)?;

    info!(
        "🚀 Starting smart-home MCP server v{}, backend: {}",
        env!("CARGO_PKG_VERSION"),
        config.backend.address()
    );
    if !config.backend.auth_token_configured() {
        warn!("No auth token configured; device tools will return an error until --token is provided");
    }

    let gateway = DeviceGateway::new(&config)?;
    let service = SmartHomeMcpServer::new(gateway)
        .serve(stdio())
        .await
        .inspect_err(|e| error!("Failed to start MCP server: {e}"))?;

    info!("✅ MCP server ready on stdio");
    service.waiting().await?;

    info!("👋 MCP server stopped");
    Ok(())
}
