//! Feature configuration (`focus.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::region::RegionSettings;

/// Focus configuration (TOML).
///
/// Missing fields fall back to the defaults below, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FocusConfig {
    /// Scheduler tick period in milliseconds.
    pub tick_period_ms: u64,

    /// Source tag attached to user-facing warnings.
    pub source_tag: String,

    /// Optional JSON Lines tick log written by `focus run`.
    pub tick_log: Option<PathBuf>,

    pub regions: RegionSettings,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            source_tag: "Focus".to_string(),
            tick_log: None,
            regions: RegionSettings::default(),
        }
    }
}

impl FocusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(anyhow!("tick_period_ms must be > 0"));
        }
        if self.source_tag.trim().is_empty() {
            return Err(anyhow!("source_tag must not be empty"));
        }
        let errors = self.regions.validate();
        if !errors.is_empty() {
            return Err(anyhow!("invalid regions: {}", errors.join("; ")));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `FocusConfig::default()`.
pub fn load_config(path: &Path) -> Result<FocusConfig> {
    if !path.exists() {
        let cfg = FocusConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FocusConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &FocusConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
