//! Process-wide default root directory.
//!
//! Stores receive their root explicitly through [`StoreConfig`]. This module
//! only supplies the default for that field: a scoped override if one is
//! active, else `DAT_ROOT`, else the current directory. The override slot is
//! the one piece of mutable global state in the crate and exists so tests can
//! isolate code paths that fall back to the default root.
//!
//! [`StoreConfig`]: crate::io::config::StoreConfig

use std::env;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

/// Environment variable naming the default root.
pub const ROOT_ENV: &str = "DAT_ROOT";

static ROOT_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

pub fn default_root() -> PathBuf {
    let overridden = ROOT_OVERRIDE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    if let Some(root) = overridden {
        return root;
    }
    match env::var_os(ROOT_ENV) {
        Some(root) if !root.is_empty() => PathBuf::from(root),
        _ => PathBuf::from("."),
    }
}

/// Replace the default root until the returned guard is dropped.
#[must_use = "the override ends when the guard is dropped"]
pub fn override_root(root: impl Into<PathBuf>) -> RootOverride {
    let root = root.into();
    debug!(root = %root.display(), "overriding default root");
    let previous = ROOT_OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(root);
    RootOverride { previous }
}

/// Restores the previous default root on drop.
#[derive(Debug)]
pub struct RootOverride {
    previous: Option<PathBuf>,
}

impl Drop for RootOverride {
    fn drop(&mut self) {
        *ROOT_OVERRIDE.write().unwrap_or_else(PoisonError::into_inner) = self.previous.take();
    }
}
