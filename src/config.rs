//! Server configuration.
//!
//! Read from an optional `checkly.toml` (or the file named by
//! `CHECKLY_CONFIG`), then overridden by `CHECKLY_ADDR`, `CHECKLY_DB_PATH`
//! and `CHECKLY_STATIC_DIR`.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::store::DEFAULT_DB_PATH;

pub const DEFAULT_CONFIG_FILE: &str = "checkly.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid listen address {0:?}")]
    Addr(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,

    /// JSON file holding the whole app state
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Frontend assets served for everything outside /api
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            db_path: default_db_path(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Config {
    /// Parse a config file. A missing file means defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File from `CHECKLY_CONFIG` (or `checkly.toml`), then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os("CHECKLY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config = Self::from_file(&file)?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    // `lookup` stands in for std::env::var so tests don't touch the process env
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(addr) = lookup("CHECKLY_ADDR") {
            self.addr = addr.parse().map_err(|_| ConfigError::Addr(addr.clone()))?;
        }
        if let Some(path) = lookup("CHECKLY_DB_PATH") {
            self.db_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("CHECKLY_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        Ok(self)
    }
}
