//! Intern table configuration (`tern.toml` format).

use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest initial capacity accepted for any table.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternTableConfig {
    /// Table sizing.
    #[serde(default)]
    pub table: TableConfig,

    /// Preloaded image strings.
    #[serde(default)]
    pub image: ImageConfig,
}

/// Initial bucket capacities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_capacity")]
    pub strong_capacity: usize,

    #[serde(default = "default_capacity")]
    pub weak_capacity: usize,

    /// The image table is sized by its source; zero lets it grow on demand.
    #[serde(default)]
    pub image_capacity: usize,
}

fn default_capacity() -> usize {
    1024
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            strong_capacity: default_capacity(),
            weak_capacity: default_capacity(),
            image_capacity: 0,
        }
    }
}

/// Image region settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// File holding one image string per line. Relative paths resolve
    /// against the directory of the config file.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl InternTableConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if let (Some(image), Some(base)) = (&config.image.path, path.parent()) {
            if image.is_relative() {
                config.image.path = Some(base.join(image));
            }
        }
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: InternTableConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let capacities = [
            ("strong_capacity", self.table.strong_capacity),
            ("weak_capacity", self.table.weak_capacity),
            ("image_capacity", self.table.image_capacity),
        ];
        for (name, value) in capacities {
            if value > MAX_INITIAL_CAPACITY {
                return Err(RuntimeError::Validation(format!(
                    "table.{} = {} exceeds the maximum of {}",
                    name, value, MAX_INITIAL_CAPACITY
                )));
            }
        }
        Ok(())
    }
}
