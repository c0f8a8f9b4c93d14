//! Configuration loading for the plotter.
//!
//! The tracked file set is fixed for the lifetime of the process. It comes from an
//! optional `multiplot.toml` in the working directory; without one the four
//! `data*.bak` defaults are used.

use anyhow::{Context, bail};
use log::LevelFilter;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "multiplot.toml";

/// Files tracked when no configuration overrides them.
pub const DEFAULT_TRACKED_FILES: [&str; 4] = ["data.bak", "data1.bak", "data2.bak", "data3.bak"];

/// Plotter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PlotterConfig {
    /// Directory holding the tracked files. Also the (non-recursive) watch scope.
    pub data_dir: PathBuf,
    /// Tracked file names, in button order.
    pub tracked_files: Vec<String>,
    /// Log level for this crate's own messages.
    pub log_level: String,
    /// Attach watchers to the grid view as well as to single-file windows.
    pub live_grid: bool,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            tracked_files: DEFAULT_TRACKED_FILES.iter().map(|name| name.to_string()).collect(),
            log_level: "debug".to_string(),
            live_grid: false,
        }
    }
}

impl PlotterConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(config_path).with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {}", config_path.display()))
    }

    /// Load `multiplot.toml` from `dir` if it exists, defaults otherwise.
    ///
    /// A present but broken file is an error; the caller decides whether to fall back.
    pub fn load_or_default(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() { Self::load(&path) } else { Ok(Self::default()) }
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: PlotterConfig = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tracked_files.is_empty() {
            bail!("tracked-files must name at least one file");
        }
        let mut seen = HashSet::new();
        for name in &self.tracked_files {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                bail!("tracked file '{}' must be a plain file name", name);
            }
            if !seen.insert(name.as_str()) {
                bail!("tracked file '{}' is listed twice", name);
            }
        }
        self.crate_log_level()?;
        Ok(())
    }

    /// Parsed `log-level`.
    pub fn crate_log_level(&self) -> anyhow::Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level).with_context(|| format!("Unknown log level '{}'", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_the_four_bak_files() {
        let config = PlotterConfig::default();
        assert_eq!(config.tracked_files, vec!["data.bak", "data1.bak", "data2.bak", "data3.bak"]);
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert!(!config.live_grid);
        assert_eq!(config.crate_log_level().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = PlotterConfig::from_toml_str("data-dir = \"/var/log/bench\"\nlive-grid = true\n").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/log/bench"));
        assert!(config.live_grid);
        assert_eq!(config.tracked_files.len(), 4);
    }

    #[test]
    fn rejects_duplicates_and_paths() {
        assert!(PlotterConfig::from_toml_str("tracked-files = [\"a.bak\", \"a.bak\"]").is_err());
        assert!(PlotterConfig::from_toml_str("tracked-files = [\"sub/a.bak\"]").is_err());
        assert!(PlotterConfig::from_toml_str("tracked-files = []").is_err());
        assert!(PlotterConfig::from_toml_str("log-level = \"loud\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = PlotterConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.tracked_files.len(), 4);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "tracked-files = [\"only.bak\"]\n").unwrap();
        let config = PlotterConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.tracked_files, vec!["only.bak"]);
    }
}
