use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port`; a leading `:` binds all interfaces.
    pub listen_addr: String,
    pub backlog: u32,
    /// Upper bound on bytes read for a single request.
    pub max_request_bytes: usize,
    /// Overrides the resolved `SERVER_NAME`.
    pub server_name: Option<String>,
    /// Emit the current time in `Date` instead of the fixed stamp.
    pub live_date: bool,
    /// Answer malformed requests with `400 Bad Request` instead of closing silently.
    pub reply_bad_request: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8888".to_string(),
            backlog: 1,
            max_request_bytes: 1024,
            server_name: None,
            live_date: false,
            reply_bad_request: false,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Defaults, then the YAML file if given, then the listen override.
    pub fn load_from(path: Option<&Path>, listen_addr: Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(addr) = listen_addr {
            cfg.server.listen_addr = addr;
        }
        cfg.server.backlog = cfg.server.backlog.max(1);

        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
