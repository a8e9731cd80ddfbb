use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetch::CursorPolicy;

const DEFAULT_API_BASE_URL: &str = "https://api.yzzy-api.com/inc/api_mac10.php";

/// Public CORS relays, tried in order. The trailing empty prefix calls the API directly.
const DEFAULT_PROXIES: [&str; 15] = [
    "https://corsproxy.io/?",
    "https://cors.eu.org/",
    "https://thingproxy.freeboard.io/fetch/?url=",
    "https://api.allorigins.win/raw?url=",
    "https://api.allorigins.cf/raw?url=",
    "https://api.allorigins.tk/raw?url=",
    "https://api.codetabs.com/v1/proxy?quest=",
    "https://yacdn.org/proxy/",
    "https://cors.bridged.cc/",
    "https://cors.sho.sh/",
    "https://cors.ironproxy.xyz/",
    "https://norobe-cors-anywhere.herokuapp.com/",
    "https://corsproxy.github.io/?url=",
    "https://cors-proxy.elfsight.com/",
    "",
];

/// Catalog client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub proxies: ProxiesConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxiesConfig {
    #[serde(default = "default_proxy_list")]
    pub list: Vec<String>,

    #[serde(default)]
    pub cursor_policy: CursorPolicy,
}

impl Default for ProxiesConfig {
    fn default() -> Self {
        Self {
            list: default_proxy_list(),
            cursor_policy: CursorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Per-attempt deadline in seconds; 0 disables it
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout: u64,

    /// Connect deadline in seconds; 0 disables it
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: default_attempt_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            proxies: ProxiesConfig::default(),
            timeouts: TimeoutsConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// Default value functions
fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }
fn default_proxy_list() -> Vec<String> { DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect() }
fn default_attempt_timeout() -> u64 { 15 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vod_catalog")
}

/// Get default config file path
/// Uses ~/.config/vod-catalog/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("vod-catalog")
        .join("config.toml")
}

/// Load config from file, or return defaults if not found.
///
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./config.toml (if exists)
/// 3. default_config_path() (usually ~/.config/vod-catalog/config.toml)
///
/// A config file that exists but does not parse or validate is an error.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    load_config_from(path, &PathBuf::from("config.toml"), &default_config_path())
}

fn load_config_from(
    path: Option<PathBuf>,
    local_config: &PathBuf,
    default_path: &PathBuf,
) -> anyhow::Result<Config> {
    if let Some(config_path) = path {
        if config_path.exists() {
            let config = parse_config_file(&config_path)?;
            tracing::info!("Loaded config from specified path {:?}", config_path);
            return Ok(config);
        } else {
            anyhow::bail!("Specified config file not found: {:?}", config_path);
        }
    }

    if local_config.exists() {
        let config = parse_config_file(local_config)?;
        tracing::info!("Loaded config from current directory {:?}", local_config);
        return Ok(config);
    }

    if default_path.exists() {
        let config = parse_config_file(default_path)?;
        tracing::info!("Loaded config from default path {:?}", default_path);
        Ok(config)
    } else {
        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}

fn parse_config_file(path: &PathBuf) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {:?}: {}", path, e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config {:?}: {}", path, e))?;
    Ok(config)
}

impl Config {
    /// Reject settings the fetch client cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.proxies.list.is_empty() {
            anyhow::bail!("proxies.list must contain at least one entry (use \"\" for direct access)");
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid api.base_url {:?}: {}", self.api.base_url, e))?;
        Ok(())
    }

    /// Data directory with `~` expanded
    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.storage.data_dir)
    }
}

/// Expand ~ in path to home directory
pub fn expand_path(path: &PathBuf) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.clone()
}
