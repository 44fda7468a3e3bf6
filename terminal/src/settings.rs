//! Host settings: the table configuration plus logging and frame rate,
//! read from an optional YAML file and overridden by flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{ensure, Context, Result};
use roulette_table::TableConfig;
use serde::Deserialize;
use tracing::Level;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_FPS: u32 = 30;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log destination while the terminal UI is up. Defaults to a file in the
    /// system temp directory.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            log_level: default_log_level(),
            log_file: None,
            fps: default_fps(),
        }
    }
}

/// Flag values that take precedence over the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub lucky: Option<u8>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub fps: Option<u32>,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(data).context("Could not parse config")?;
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(lucky) = overrides.lucky {
            self.table.lucky_number = Some(lucky);
        }
        if let Some(seed) = overrides.seed {
            self.table.seed = Some(seed);
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(file) = overrides.log_file {
            self.log_file = Some(file);
        }
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
    }

    /// Check host values and the table configuration.
    pub fn validate(&self) -> Result<Level> {
        let level = Level::from_str(&self.log_level).context("Invalid log level")?;
        ensure!((1..=240).contains(&self.fps), "fps must be in 1..=240, got {}", self.fps);
        self.table.validate().context("Invalid table config")?;
        Ok(level)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("roulette-terminal.log"))
    }
}
