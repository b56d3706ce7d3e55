use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "journal.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOG_FILTER: &str = "daily_journal=info,journal=info,tower_http=info";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Where the document store lives and how long a connection waits on a
/// locked store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub log_format: LogFormat,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            store: StoreConfig::default(),
            log_format: LogFormat::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Read settings from the process environment.
    ///
    /// Variables: `HOST`, `PORT`, `JOURNAL_DB`, `JOURNAL_DB_TIMEOUT_MS`,
    /// `LOG_FORMAT`, `RUST_LOG`. Unset or empty variables keep their default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| JournalError::Config(format!("PORT must be a port number, got '{}'", port)))?;
        }
        if let Some(path) = get("JOURNAL_DB") {
            config.store.path = PathBuf::from(path);
        }
        if let Some(timeout) = get("JOURNAL_DB_TIMEOUT_MS") {
            config.store.busy_timeout_ms = timeout.trim().parse().map_err(|_| {
                JournalError::Config(format!(
                    "JOURNAL_DB_TIMEOUT_MS must be a number of milliseconds, got '{}'",
                    timeout
                ))
            })?;
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = format.parse().map_err(JournalError::Config)?;
        }
        if let Some(filter) = get("RUST_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Address to bind the HTTP listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
