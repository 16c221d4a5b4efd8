//! Declared type names mapped to record constructors.
//!
//! The registry is filled once during bootstrap, then frozen inside a
//! [`Store`]. Loading a record looks up its `main.class` here; a name that was
//! never registered is an error, never a silent fallback to the base type.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DatError, Result};
use crate::io::container::Container;
use crate::io::record::{Dat, Record};
use crate::io::store::Store;

/// Type name of a plain record; assumed when a spec declares none.
pub const BASE_TYPE: &str = "Dat";
/// Type name of a record whose subdirectories are records.
pub const CONTAINER_TYPE: &str = "DatContainer";

/// Builds a concrete variant from a loaded record.
pub type Constructor = fn(Record, &Store) -> Box<dyn Dat>;

#[derive(Clone)]
pub struct Registry {
    constructors: BTreeMap<String, Constructor>,
}

impl Registry {
    /// A registry with no types, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// A registry knowing `Dat` and `DatContainer`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry
            .constructors
            .insert(BASE_TYPE.to_string(), construct_record);
        registry
            .constructors
            .insert(CONTAINER_TYPE.to_string(), construct_container);
        registry
    }

    /// Register `name`. Names must be identifiers and may be registered once.
    pub fn register(&mut self, name: &str, constructor: Constructor) -> Result<()> {
        validate_name(name)?;
        if self.constructors.contains_key(name) {
            return Err(DatError::InvalidTypeName {
                name: name.to_string(),
                reason: "already registered",
            });
        }
        self.constructors.insert(name.to_string(), constructor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Constructor> {
        self.constructors
            .get(name)
            .copied()
            .ok_or_else(|| DatError::UnknownType {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason| DatError::InvalidTypeName {
        name: name.to_string(),
        reason,
    };
    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("empty")),
        Some(first) if !first.is_ascii_alphabetic() => {
            return Err(invalid("must start with a letter"));
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only letters, digits and underscores are allowed"));
    }
    Ok(())
}

fn construct_record(record: Record, _store: &Store) -> Box<dyn Dat> {
    Box::new(record)
}

fn construct_container(record: Record, store: &Store) -> Box<dyn Dat> {
    Box::new(Container::from_record(record, store))
}
