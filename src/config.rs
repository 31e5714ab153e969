use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::content::Difficulty;
use crate::typing::DEFAULT_TIME_LIMIT_SECS;

/// Time limits offered by the test view, in seconds
pub const TIMER_LIMITS: [u32; 4] = [15, 30, 60, 120];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub test_duration_secs: u32,
    pub test_difficulty: Difficulty,
    pub game_difficulty: Difficulty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_duration_secs: DEFAULT_TIME_LIMIT_SECS,
            test_difficulty: Difficulty::Medium,
            game_difficulty: Difficulty::Medium,
        }
    }
}

impl Config {
    /// The next entry of `TIMER_LIMITS` after the current duration
    pub fn next_timer_limit(&self) -> u32 {
        TIMER_LIMITS
            .iter()
            .copied()
            .find(|limit| *limit > self.test_duration_secs)
            .unwrap_or(TIMER_LIMITS[0])
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
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typemaster_config.json"));
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
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
