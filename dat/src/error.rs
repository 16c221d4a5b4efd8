//! Typed failures surfaced by the record store.
//!
//! Every fallible library operation returns [`DatError`]. Callers that only
//! care about the category match on [`DatError::kind`].

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatError>;

/// Category of a [`DatError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    TypeConflict,
    UnresolvedPlaceholder,
    UnknownType,
    InvalidTypeName,
    InvalidAssignment,
    Decode,
    WriteFailure,
}

#[derive(Debug, Error)]
pub enum DatError {
    /// A key path did not resolve inside a spec.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// No readable spec file at the given record location.
    #[error("no record at {}", path.display())]
    RecordNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("record already exists at {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// A write tried to descend through a value that is not a mapping.
    #[error("cannot descend into {key}: holds a non-mapping value")]
    TypeConflict { key: String },

    /// A record expected to be a container was loaded as another type.
    #[error("{} is a {class}, not a container", path.display())]
    NotAContainer { path: PathBuf, class: String },

    #[error("unresolved placeholder {placeholder:?} in template {template:?}")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("unknown record type {name:?}")]
    UnknownType { name: String },

    #[error("invalid record type name {name:?}: {reason}")]
    InvalidTypeName { name: String, reason: &'static str },

    /// A bulk assignment was not of the form `dotted.path = literal`.
    #[error("invalid assignment {text:?}: expected `dotted.path = literal`")]
    InvalidAssignment { text: String },

    #[error("decode spec {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("write {}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DatError::KeyNotFound { .. } | DatError::RecordNotFound { .. } => ErrorKind::NotFound,
            DatError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            DatError::TypeConflict { .. } | DatError::NotAContainer { .. } => {
                ErrorKind::TypeConflict
            }
            DatError::UnresolvedPlaceholder { .. } => ErrorKind::UnresolvedPlaceholder,
            DatError::UnknownType { .. } => ErrorKind::UnknownType,
            DatError::InvalidTypeName { .. } => ErrorKind::InvalidTypeName,
            DatError::InvalidAssignment { .. } => ErrorKind::InvalidAssignment,
            DatError::Decode { .. } => ErrorKind::Decode,
            DatError::WriteFailure { .. } => ErrorKind::WriteFailure,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatError::WriteFailure {
            path: path.into(),
            source,
        }
    }
}
