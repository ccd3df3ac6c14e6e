use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// One tracked exchange-traded fund. The catalog is fixed for the life of
/// a run; nothing mutates it after config load.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Fund {
    pub code: String,
    pub name: String,
}

impl Fund {
    pub fn new(code: &str, name: &str) -> Self {
        Fund {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://www.jisilu.cn".to_string(),
        }
    }
}

fn default_market_close_hour() -> u32 {
    15
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub funds: Vec<Fund>,
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Directory holding one history file per fund code. Defaults to the
    /// platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Local wall-clock hour after which intraday quotes are final and no
    /// longer fetched.
    #[serde(default = "default_market_close_hour")]
    pub market_close_hour: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            funds: vec![
                Fund::new("510500", "ETF500"),
                Fund::new("510300", "ETF300"),
                Fund::new("510050", "ETF50"),
                Fund::new("515000", "科技ETF"),
                Fund::new("512880", "券商ETF"),
                Fund::new("512290", "医药ETF"),
                Fund::new("159949", "创业50ETF"),
            ],
            provider: ProviderConfig::default(),
            data_dir: None,
            market_close_hour: default_market_close_hour(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using built-in fund catalog");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "etfshare", "etfshare")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "etfshare", "etfshare")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("db"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_path(),
        }
    }
}
