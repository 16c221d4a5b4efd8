//! Records whose immediate subdirectories are records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::codec::SPEC_FILE;
use super::record::{Dat, Record};
use super::store::Store;
use crate::core::spec::{Spec, SpecSource, SpecTarget};
use crate::error::{DatError, Result};

/// A record backed by a directory of child records.
///
/// Children are never cached: every listing re-reads the directory, and
/// children are loaded through the store's registry so nested containers come
/// back as containers.
#[derive(Debug, Clone)]
pub struct Container {
    record: Record,
    store: Store,
}

impl Container {
    pub(crate) fn from_record(record: Record, store: &Store) -> Self {
        Self {
            record,
            store: store.clone(),
        }
    }

    /// Child record paths in lexicographic order of their directory names.
    ///
    /// Only immediate subdirectories holding a spec file count. A container
    /// that was never saved has no children.
    pub fn dat_paths(&self) -> Result<Vec<PathBuf>> {
        let location = self.record.location();
        let entries = match fs::read_dir(location) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(not_readable(location, err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| not_readable(location, err))?;
            let child = entry.path();
            if child.is_dir() && child.join(SPEC_FILE).is_file() {
                names.push(entry.file_name());
            }
        }
        names.sort();
        debug!(path = %self.record.path().display(), children = names.len(), "listed container");

        Ok(names
            .into_iter()
            .map(|name| self.record.path().join(name))
            .collect())
    }

    /// Load every child as its declared type, in [`Container::dat_paths`] order.
    pub fn dats(&self) -> Result<Vec<Box<dyn Dat>>> {
        self.dat_paths()?
            .iter()
            .map(|path| self.store.load(path))
            .collect()
    }

    /// Every descendant, depth-first pre-order, descending into nested
    /// containers.
    pub fn walk(&self) -> Result<Vec<Box<dyn Dat>>> {
        let mut out = Vec::new();
        for child in self.dats()? {
            let nested = match child.as_container() {
                Some(container) => container.walk()?,
                None => Vec::new(),
            };
            out.push(child);
            out.extend(nested);
        }
        Ok(out)
    }
}

fn not_readable(location: &Path, err: io::Error) -> DatError {
    DatError::RecordNotFound {
        path: location.to_path_buf(),
        source: Some(err),
    }
}

impl SpecSource for Container {
    fn spec(&self) -> &Spec {
        self.record.spec()
    }
}

impl SpecTarget for Container {
    fn spec_mut(&mut self) -> &mut Spec {
        self.record.spec_mut()
    }
}

impl Dat for Container {
    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn as_container(&self) -> Option<&Container> {
        Some(self)
    }

    fn into_container(self: Box<Self>) -> Option<Container> {
        Some(*self)
    }
}
