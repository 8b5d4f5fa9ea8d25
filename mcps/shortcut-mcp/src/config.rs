//! Configuration loading for shortcut-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable SHORTCUT_API_TOKEN (required, never from file)
//! 2. Environment variable SHORTCUT_API_URL (base URL override)
//! 3. File at SHORTCUT_MCP_CONFIG_PATH
//! 4. <config dir>/shortcut-mcp/config.toml
//! 5. Default values

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "SHORTCUT_API_TOKEN";
pub const URL_ENV: &str = "SHORTCUT_API_URL";
pub const CONFIG_PATH_ENV: &str = "SHORTCUT_MCP_CONFIG_PATH";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// API token, taken from the environment only
    #[serde(skip)]
    pub token: String,
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Reference-data cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long member and workflow snapshots stay valid
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// Listing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Stories shown per listing before the remainder count
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// HTTP 429 handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Used when Retry-After is missing or not a number of seconds
    #[serde(default = "default_retry_after")]
    pub default_retry_after_seconds: u64,
}

fn default_base_url() -> String {
    "https://api.app.shortcut.com/api/v3".to_string()
}

fn default_user_agent() -> String {
    format!("shortcut-mcp/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_limit() -> usize {
    25
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_after() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            default_retry_after_seconds: default_retry_after(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Fails when the API token is not set.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                Self::from_file(&path)?
            }
            Some(path) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            None => {
                tracing::info!("No config path available, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(URL_ENV) {
            config.api.base_url = url;
        }

        config.token = match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => token,
            _ => bail!("{} environment variable is required", TOKEN_ENV),
        };

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        dirs::config_dir().map(|dir| dir.join("shortcut-mcp").join("config.toml"))
    }
}
