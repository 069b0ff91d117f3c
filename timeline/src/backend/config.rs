//! # Timeline Configuration
//!
//! Tunables for the scheduling grid, stored as a single YAML file.
//!
//! ## YAML Format
//!
//! ```yaml
//! initial_days: 90
//! days_increment: 30
//! scroll_threshold: 0.8
//! expansion_delay_ms: 100
//! default_allocation_days: 5
//! cell_width: 40.0
//! cell_height: 64.0
//! default_project_color: "#3b82f6"
//! avatar_base_url: "https://ui-avatars.com/api/"
//! ```
//!
//! Missing keys fall back to their defaults, so an empty file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Configuration for the timeline grid and its interactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Number of days visible when the timeline is first mounted
    pub initial_days: u32,
    /// Days appended on every scroll-triggered expansion
    pub days_increment: u32,
    /// Horizontal scroll fraction above which more days are loaded
    pub scroll_threshold: f64,
    /// Delay before an expansion takes effect
    pub expansion_delay_ms: u64,
    /// Inclusive length of an allocation created by clicking an empty cell
    pub default_allocation_days: u32,
    /// Cell width used until a rendered cell is measured
    pub cell_width: f64,
    /// Cell height used until a rendered cell is measured
    pub cell_height: f64,
    /// Color offered for new projects
    pub default_project_color: String,
    /// Avatar service used for new team members
    pub avatar_base_url: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            initial_days: 90,
            days_increment: 30,
            scroll_threshold: 0.8,
            expansion_delay_ms: 100,
            default_allocation_days: 5,
            cell_width: 40.0,
            cell_height: 64.0,
            default_project_color: "#3b82f6".to_string(),
            avatar_base_url: "https://ui-avatars.com/api/".to_string(),
        }
    }
}

impl TimelineConfig {
    /// Load the config file, or the defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: TimelineConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;

        debug!("Loaded timeline config from {:?}", path);
        Ok(config)
    }

    /// Save the config using a temp file and rename
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        debug!("Saved timeline config to {:?}", path);
        Ok(())
    }

    /// Reject values the grid cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.initial_days == 0 {
            anyhow::bail!("initial_days must be at least 1");
        }
        if self.days_increment == 0 {
            anyhow::bail!("days_increment must be at least 1");
        }
        if !(self.scroll_threshold > 0.0 && self.scroll_threshold <= 1.0) {
            anyhow::bail!("scroll_threshold must be in (0, 1], got {}", self.scroll_threshold);
        }
        if self.default_allocation_days == 0 {
            anyhow::bail!("default_allocation_days must be at least 1");
        }
        if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            anyhow::bail!("cell dimensions must be positive");
        }
        Ok(())
    }
}
