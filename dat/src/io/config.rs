//! Store configuration, optionally read from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::template::Template;
use crate::root::default_root;

/// Store configuration (TOML).
///
/// Missing fields take their defaults; a missing file is the default config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory for relative record paths.
    pub root: PathBuf,

    /// Template used when a spec carries no `main.path`.
    pub default_template: String,

    /// Candidates probed for `{unique}` before giving up.
    pub unique_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            default_template: "dats/{YY}-{MM} Dat{unique}".to_string(),
            unique_attempts: 1000,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(anyhow!("root must not be empty"));
        }
        if self.unique_attempts == 0 {
            return Err(anyhow!("unique_attempts must be > 0"));
        }
        Template::parse(&self.default_template).context("default_template")?;
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `StoreConfig::default()`.
pub fn load_config(path: &Path) -> Result<StoreConfig> {
    if !path.exists() {
        let cfg = StoreConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: StoreConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
