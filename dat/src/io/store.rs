//! Construct, create and load records under a root directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::debug;

use super::codec::{self, SPEC_FILE};
use super::config::StoreConfig;
use super::container::Container;
use super::record::{Dat, Record, remove_tree};
use super::resolve::{clean_path, location, resolve_path};
use crate::core::access;
use crate::core::spec::{self, CLASS_KEY, Spec};
use crate::error::{DatError, Result};
use crate::registry::{BASE_TYPE, CONTAINER_TYPE, Registry};

/// Handle on a record tree: the root, the frozen class registry and the
/// creation settings. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    default_template: String,
    unique_attempts: u32,
    registry: Arc<Registry>,
}

impl Store {
    pub fn new(config: &StoreConfig, registry: Registry) -> Self {
        Self {
            root: config.root.clone(),
            default_template: config.default_template.clone(),
            unique_attempts: config.unique_attempts,
            registry: Arc::new(registry),
        }
    }

    /// Store at `root` with default settings and the built-in types.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let config = StoreConfig {
            root: root.into(),
            ..StoreConfig::default()
        };
        Self::new(&config, Registry::with_builtins())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Directory backing a resolved record path.
    pub fn location(&self, path: &Path) -> PathBuf {
        location(&self.root, path)
    }

    /// Resolve a path or template to a literal record path for today's date.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        self.resolve_on(path, Local::now().date_naive())
    }

    pub fn resolve_on(&self, path: &str, today: NaiveDate) -> Result<PathBuf> {
        resolve_path(&self.root, path, today, self.unique_attempts)
    }

    /// Bind `spec` to `path` in memory. Nothing is written until `save`.
    ///
    /// Templates are resolved here, once. Without `overwrite`, an existing
    /// spec file at the resolved path is an error.
    pub fn create(&self, spec: Spec, path: impl AsRef<Path>, overwrite: bool) -> Result<Record> {
        let path = path.as_ref();
        let resolved = match path.to_str() {
            Some(text) => self.resolve(text)?,
            None => clean_path(path),
        };
        let record_location = self.location(&resolved);
        if !overwrite && record_location.join(SPEC_FILE).is_file() {
            return Err(DatError::AlreadyExists { path: resolved });
        }
        debug!(path = %resolved.display(), overwrite, "constructed record");
        Ok(Record::new(spec, resolved, record_location, overwrite))
    }

    /// Construct a container; its spec is stamped with the container type.
    pub fn container(
        &self,
        mut spec: Spec,
        path: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<Container> {
        access::set(&mut spec, CLASS_KEY, Value::String(CONTAINER_TYPE.to_string()))?;
        let record = self.create(spec, path, overwrite)?;
        Ok(Container::from_record(record, self))
    }

    /// Create a record at its `main.path` template (or the default template)
    /// and save it immediately.
    pub fn from_template(&self, spec: Spec) -> Result<Record> {
        let template = spec::declared_template(&spec)
            .unwrap_or(self.default_template.as_str())
            .to_string();
        let mut record = self.create(spec, template, false)?;
        record.save()?;
        Ok(record)
    }

    /// Load the record at `path` as its declared type.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Box<dyn Dat>> {
        let path = clean_path(path.as_ref());
        let record_location = self.location(&path);
        let spec_file = record_location.join(SPEC_FILE);
        let text = fs::read_to_string(&spec_file).map_err(|err| DatError::RecordNotFound {
            path: path.clone(),
            source: Some(err),
        })?;
        let spec = codec::decode(&text, &spec_file)?;

        let class = spec::declared_type(&spec)?.unwrap_or(BASE_TYPE).to_string();
        let constructor = self.registry.lookup(&class)?;
        debug!(path = %path.display(), class = %class, "loaded record");
        Ok(constructor(Record::loaded(spec, path, record_location), self))
    }

    /// Load the record at `path`, requiring it to be a container.
    pub fn load_container(&self, path: impl AsRef<Path>) -> Result<Container> {
        let dat = self.load(path)?;
        let class = dat.class_name()?.to_string();
        let path = dat.path().to_path_buf();
        dat.into_container()
            .ok_or(DatError::NotAContainer { path, class })
    }

    /// Delete the record tree at `path` without loading it.
    pub fn delete(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = clean_path(path.as_ref());
        remove_tree(&path, &self.location(&path))
    }
}
