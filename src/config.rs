//! Server configuration
//!
//! Loaded once at startup from a YAML file and never mutated afterwards.
//! Only `port` is required; everything else falls back to the defaults
//! below.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ROOT: &str = "./www";
pub const DEFAULT_ACCESS_LOG: &str = "logs/access.log";
pub const DEFAULT_ERROR_LOG: &str = "logs/error.log";
pub const DEFAULT_MAX_CONNECTIONS: usize = 64;
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DOCUMENT: &str = "index.html";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("required field `port` is missing")]
    MissingPort,

    #[error("port {0} is out of range (1-65535)")]
    InvalidPort(i64),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Immutable server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root: PathBuf,
    /// Client IP patterns allowed to connect. Empty means everyone.
    pub accept: Vec<String>,
    /// Client IP patterns refused before anything else is checked.
    pub reject: Vec<String>,
    pub access_log: PathBuf,
    pub error_log: PathBuf,
    pub max_connections: usize,
    pub io_timeout_secs: u64,
    pub default_document: String,
}

/// On-disk shape. Kept separate so the port can be validated by hand
/// instead of surfacing a bare serde range error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    port: Option<i64>,
    host: Option<String>,
    root: Option<PathBuf>,
    #[serde(default)]
    accept: Vec<String>,
    #[serde(default)]
    reject: Vec<String>,
    access_log: Option<PathBuf>,
    error_log: Option<PathBuf>,
    max_connections: Option<usize>,
    io_timeout_secs: Option<u64>,
    default_document: Option<String>,
}

impl ServerConfig {
    /// Reads and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        raw.try_into()
    }

    /// Address the listener binds to.
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen host {}: {}", self.host, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}

impl TryFrom<RawConfig> for ServerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let port = raw.port.ok_or(ConfigError::MissingPort)?;
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ConfigError::InvalidPort(port))?;

        let max_connections = raw.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                field: "max_connections",
                reason: "must be at least 1".to_string(),
            });
        }
        if max_connections > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Invalid {
                field: "max_connections",
                reason: format!("must be at most {}", Semaphore::MAX_PERMITS),
            });
        }

        let io_timeout_secs = raw.io_timeout_secs.unwrap_or(DEFAULT_IO_TIMEOUT_SECS);
        if io_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "io_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        let default_document = raw
            .default_document
            .unwrap_or_else(|| DEFAULT_DOCUMENT.to_string());
        if default_document.trim().is_empty() || default_document.contains('/') {
            return Err(ConfigError::Invalid {
                field: "default_document",
                reason: format!("`{}` is not a plain file name", default_document),
            });
        }

        Ok(Self {
            host: raw.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            root: raw.root.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
            accept: clean_patterns(raw.accept),
            reject: clean_patterns(raw.reject),
            access_log: raw
                .access_log
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ACCESS_LOG)),
            error_log: raw
                .error_log
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG)),
            max_connections,
            io_timeout_secs,
            default_document,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
            accept: Vec::new(),
            reject: Vec::new(),
            access_log: PathBuf::from(DEFAULT_ACCESS_LOG),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            io_timeout_secs: DEFAULT_IO_TIMEOUT_SECS,
            default_document: DEFAULT_DOCUMENT.to_string(),
        }
    }
}

fn clean_patterns(patterns: Vec<String>) -> Vec<String> {
    patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
