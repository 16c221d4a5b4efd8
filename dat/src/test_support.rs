//! Test-only helpers: isolated roots and spec fixtures.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

use crate::core::spec::Spec;
use crate::io::codec::SPEC_FILE;
use crate::io::config::StoreConfig;
use crate::io::store::Store;
use crate::registry::Registry;

/// A temporary root directory with a store bound to it.
///
/// The directory is removed when the value is dropped.
pub struct TestRoot {
    temp: TempDir,
    pub store: Store,
}

impl TestRoot {
    pub fn new() -> Result<Self> {
        Self::with_registry(Registry::with_builtins())
    }

    pub fn with_registry(registry: Registry) -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp root")?;
        let config = StoreConfig {
            root: temp.path().to_path_buf(),
            ..Default::default()
        };
        let store = Store::new(&config, registry);
        Ok(Self { temp, store })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `spec` as JSON into `<root>/<rel>/_spec_.yaml`, bypassing the store.
    pub fn write_raw_spec(&self, rel: &str, spec: &Value) -> Result<()> {
        let dir = self.temp.path().join(rel);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let body = serde_json::to_string(spec)?;
        fs::write(dir.join(SPEC_FILE), body).with_context(|| format!("write spec in {rel}"))
    }
}

/// Convert a `json!` object literal into a spec.
pub fn spec(value: Value) -> Spec {
    match value {
        Value::Object(map) => map,
        other => panic!("spec fixture must be an object, got {other}"),
    }
}
