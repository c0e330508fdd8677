use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::TICK_INTERVAL_MS;
use crate::pass::{PassCatalog, PassType};

/// How the active pass is layered over the selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// active pass drawn full-screen on top of the selection screen
    #[default]
    Overlay,
    /// active pass replaces the selection screen
    Inline,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub default_pass: PassType,
    pub catalog: PassCatalog,
    pub presentation: Presentation,
    /// IANA zone name; local zone when unset
    pub timezone: Option<String>,
    pub tick_interval_ms: u64,
    pub agency_name: String,
    pub agency_full_name: String,
    pub region: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_pass: PassType::FourHour,
            catalog: PassCatalog::Full,
            presentation: Presentation::Overlay,
            timezone: None,
            tick_interval_ms: TICK_INTERVAL_MS,
            agency_name: "DART".to_string(),
            agency_full_name: "Detroit Area Regional Transportation".to_string(),
            region: "Detroit, MI".to_string(),
        }
    }
}

impl Config {
    /// Never zero, the timer would spin
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "transit-pass") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("transit_pass_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return Config::default();
            }
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => {
                info!(path = %self.path.display(), "config_loaded");
                cfg
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)?;
        info!(path = %self.path.display(), "config_saved");
        Ok(())
    }
}
