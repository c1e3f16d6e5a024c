//! Persisted boolean preferences.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::io::config::write_atomic;

/// Key/value boolean preference store.
pub trait Preferences {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn set_bool(&mut self, key: &str, value: bool) -> Result<()>;

    /// Store `value` only if `key` has never been set.
    fn set_default_bool(&mut self, key: &str, value: bool) -> Result<()> {
        if self.get_bool(key).is_none() {
            self.set_bool(key, value)?;
        }
        Ok(())
    }
}

/// Preferences held in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    values: BTreeMap<String, bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    values: BTreeMap<String, bool>,
}

/// Preferences persisted to a TOML file, rewritten atomically on every change.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, bool>,
}

impl FilePreferences {
    /// Open the store at `path`. A missing file starts empty.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let contents =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            let file: PreferencesFile =
                toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
            file.values
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), count = values.len(), "preferences loaded");
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn persist(&self) -> Result<()> {
        let file = PreferencesFile {
            values: self.values.clone(),
        };
        let mut buf = toml::to_string_pretty(&file).context("serialize preferences toml")?;
        buf.push('\n');
        write_atomic(&self.path, &buf)
    }
}

impl Preferences for FilePreferences {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        if self.values.get(key) == Some(&value) && self.path.exists() {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.persist()
    }
}
