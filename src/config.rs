//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::error::{PanelError, Result};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "refill-panel")]
#[command(about = "A terminal panel for live refill countdown timers")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Origin of the refill timer server (scheme, host and port)
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// Mount point of the timer application on the server
    #[arg(long, default_value = "/tools/wos/refill-bot-en")]
    pub root_path: String,

    /// Countdown redraw granularity in milliseconds
    #[arg(long, default_value = "250", value_parser = clap::value_parser!(u64).range(10..=250))]
    pub tick_ms: u64,

    /// Do not clear the terminal before each redraw
    #[arg(long)]
    pub no_clear: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Server endpoints derived from the configured origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Prefix for the REST routes, without a trailing slash
    pub api_base: String,
    /// WebSocket URL of the state broadcast channel
    pub ws_url: String,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        derive_endpoints(&self.server, &self.root_path)
    }
}

/// Derive the REST base and WebSocket URL from an origin. A secure origin
/// gets a secure WebSocket scheme.
pub fn derive_endpoints(origin: &str, root_path: &str) -> Result<Endpoints> {
    let invalid = |message: String| PanelError::Endpoint {
        url: origin.to_string(),
        message,
    };

    let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
    let ws_scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    };
    let host = url
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;
    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let root = normalize_root(root_path);
    Ok(Endpoints {
        api_base: format!("{}://{}{}/api", url.scheme(), authority, root),
        ws_url: format!("{}://{}{}/ws", ws_scheme, authority, root),
    })
}

/// `"/a/b/"`, `"a/b"` and `"/a/b"` all become `"/a/b"`; `"/"` becomes `""`.
fn normalize_root(root_path: &str) -> String {
    let trimmed = root_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
