use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default CDS API endpoint.
pub const DEFAULT_API_URL: &str = "https://cds.climate.copernicus.eu/api";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per API call (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/cdsfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdsConfig {
    /// CDS API endpoint.
    pub url: String,
    /// API key in `uid:key` form, as issued by the CDS account page.
    /// Jobs that only plan or convert run without one.
    #[serde(default)]
    pub key: Option<String>,
    /// Seconds between task status polls while a request sits in the queue.
    pub poll_interval_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for CdsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            key: None,
            poll_interval_secs: 5,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cdsfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CdsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CdsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CdsConfig = toml::from_str(&data)?;
    Ok(cfg)
}
