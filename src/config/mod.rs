//! Configuration Management
//!
//! Loads console settings from TOML files with environment overrides:
//! - API endpoint and HTTP timeouts
//! - Query cache lifetime and capacity
//! - Search debounce and default page size
//! - Terminal UI refresh rate and log directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::PoliticosError;

pub const LOCAL_CONFIG_FILE: &str = "politicos.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds before a cached query result goes stale.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a name search commits.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Where the terminal UI writes its log files. Defaults to the
    /// platform data directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_cache_entries() -> usize {
    256
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_per_page() -> u32 {
    10
}
fn default_tick_ms() -> u64 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            http: HttpConfig::default(),
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_per_page: default_per_page(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load from an explicit path, else `politicos.toml` in the working
    /// directory, else `~/.config/politicos/config.toml`, else defaults.
    /// Environment variables override whatever was loaded.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config from {}", p))?;
                toml::from_str(&content).context("Failed to parse config")?
            }
            None => {
                let mut default_paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
                if let Some(home) = dirs::home_dir() {
                    default_paths.push(home.join(".config/politicos/config.toml"));
                }

                let mut loaded = None;
                for p in &default_paths {
                    if let Ok(content) = std::fs::read_to_string(p) {
                        tracing::debug!("Loading config from {}", p.display());
                        loaded = Some(toml::from_str(&content).context("Failed to parse config")?);
                        break;
                    }
                }
                loaded.unwrap_or_else(|| {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                })
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `POLITICOS_*` overrides. Unparseable numbers are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("POLITICOS_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = lookup("POLITICOS_TIMEOUT") {
            if let Ok(t) = timeout.parse::<u64>() {
                self.http.timeout_secs = t;
            }
        }
        if let Some(debounce) = lookup("POLITICOS_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.parse::<u64>() {
                self.search.debounce_ms = ms;
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), PoliticosError> {
        let parsed = url::Url::parse(&self.endpoint).map_err(|e| {
            PoliticosError::Config(format!("invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PoliticosError::Config(format!(
                "endpoint must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.search.default_per_page == 0 {
            return Err(PoliticosError::Config(
                "search.default_per_page must be at least 1".to_string(),
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(PoliticosError::Config(
                "cache.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory for TUI log files.
    pub fn log_dir(&self) -> PathBuf {
        self.ui.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("politicos")
                .join("logs")
        })
    }
}
