//! The base persistable record and the [`Dat`] trait shared by its variants.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use super::codec::{self, SPEC_FILE};
use super::container::Container;
use crate::core::access;
use crate::core::key_path::KeyPath;
use crate::core::spec::{self, Spec, SpecSource, SpecTarget};
use crate::error::{DatError, Result};
use crate::registry::BASE_TYPE;

/// How the next save may treat an existing spec file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    /// First save of a new record: fail if someone else wrote the file first.
    Create,
    /// The file belongs to this record: replace it.
    Replace,
}

/// A spec bound to a resolved directory.
///
/// The path is fixed at construction. Relative paths are kept as given and
/// resolved against the store root only for I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    spec: Spec,
    path: PathBuf,
    location: PathBuf,
    claim: Claim,
}

impl Record {
    pub(crate) fn new(spec: Spec, path: PathBuf, location: PathBuf, overwrite: bool) -> Self {
        Self {
            spec,
            path,
            location,
            claim: if overwrite { Claim::Replace } else { Claim::Create },
        }
    }

    pub(crate) fn loaded(spec: Spec, path: PathBuf, location: PathBuf) -> Self {
        Self::new(spec, path, location, true)
    }

    /// Resolved path, relative to the store root unless absolute.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_name(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Directory on disk backing this record.
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn spec_file(&self) -> PathBuf {
        self.location.join(SPEC_FILE)
    }

    pub fn exists(&self) -> bool {
        self.spec_file().is_file()
    }

    /// Declared type name, defaulting to the base type when none is declared.
    ///
    /// A `main.class` that is not a string is [`DatError::UnknownType`], as it
    /// is on load.
    pub fn class_name(&self) -> Result<&str> {
        Ok(spec::declared_type(&self.spec)?.unwrap_or(BASE_TYPE))
    }

    pub fn get<K: Into<KeyPath>>(&self, key: K) -> Result<&Value> {
        access::get(self, key)
    }

    pub fn gets<I>(&self, keys: I) -> Result<Vec<&Value>>
    where
        I: IntoIterator,
        I::Item: Into<KeyPath>,
    {
        access::gets(self, keys)
    }

    pub fn set<K: Into<KeyPath>>(&mut self, key: K, value: Value) -> Result<()> {
        access::set(self, key, value)
    }

    pub fn sets<I>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        access::sets(self, assignments)
    }

    /// Write the spec file, creating the directory if needed.
    ///
    /// The spec is written to a temporary file beside the target and moved into
    /// place, so readers never see a partial file. The temporary file is removed
    /// on every failure path. The first save of a record constructed without
    /// `overwrite` refuses to replace a spec file that appeared since
    /// construction.
    pub fn save(&mut self) -> Result<()> {
        let target = self.spec_file();
        debug!(path = %target.display(), claim = ?self.claim, "saving record");
        fs::create_dir_all(&self.location).map_err(|err| DatError::write(&self.location, err))?;

        let body = codec::encode(&self.spec, &target)?;
        let mut staged = tempfile::Builder::new()
            .prefix("._spec_")
            .suffix(".tmp")
            .tempfile_in(&self.location)
            .map_err(|err| DatError::write(&self.location, err))?;
        staged
            .write_all(body.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| DatError::write(staged.path(), err))?;

        let persisted = match self.claim {
            Claim::Create => staged.persist_noclobber(&target),
            Claim::Replace => staged.persist(&target),
        };
        if let Err(err) = persisted {
            if err.error.kind() == io::ErrorKind::AlreadyExists {
                return Err(DatError::AlreadyExists {
                    path: self.path.clone(),
                });
            }
            return Err(DatError::write(&target, err.error));
        }

        self.claim = Claim::Replace;
        info!(path = %self.path.display(), "record saved");
        Ok(())
    }

    /// Remove the backing directory tree. Returns whether anything was removed.
    pub fn delete(&self) -> Result<bool> {
        remove_tree(&self.path, &self.location)
    }
}

impl SpecSource for Record {
    fn spec(&self) -> &Spec {
        &self.spec
    }
}

impl SpecTarget for Record {
    fn spec_mut(&mut self) -> &mut Spec {
        &mut self.spec
    }
}

/// Recursively remove a record directory; an absent directory is not an error.
pub(crate) fn remove_tree(path: &Path, location: &Path) -> Result<bool> {
    match fs::remove_dir_all(location) {
        Ok(()) => {
            info!(path = %path.display(), "record deleted");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "record already absent");
            Ok(false)
        }
        Err(err) => Err(DatError::write(location, err)),
    }
}

/// A loaded record of some registered variant.
///
/// Variants wrap a [`Record`] and expose it here; save and delete always go
/// through the wrapped record.
pub trait Dat: SpecTarget + fmt::Debug + Send {
    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    fn as_container(&self) -> Option<&Container> {
        None
    }

    fn into_container(self: Box<Self>) -> Option<Container> {
        None
    }

    fn path(&self) -> &Path {
        self.record().path()
    }

    fn class_name(&self) -> Result<&str> {
        self.record().class_name()
    }

    fn save(&mut self) -> Result<()> {
        self.record_mut().save()
    }

    fn delete(&self) -> Result<bool> {
        self.record().delete()
    }
}

impl Dat for Record {
    fn record(&self) -> &Record {
        self
    }

    fn record_mut(&mut self) -> &mut Record {
        self
    }
}

impl SpecSource for Box<dyn Dat> {
    fn spec(&self) -> &Spec {
        (**self).spec()
    }
}

impl SpecTarget for Box<dyn Dat> {
    fn spec_mut(&mut self) -> &mut Spec {
        (**self).spec_mut()
    }
}
