//! Spec representation and the reserved `main` fields.
//!
//! A spec has no schema. It is a JSON-style mapping whose values are
//! themselves mappings, sequences or scalars, so [`serde_json::Value`] is used
//! as the recursive value type throughout.

use serde_json::{Map, Value};

use crate::error::{DatError, Result};

/// Nested mapping of named fields describing a record.
pub type Spec = Map<String, Value>;

/// Reserved top-level section carrying record metadata.
pub const MAIN: &str = "main";
/// Dotted key of the declared type name.
pub const CLASS_KEY: &str = "main.class";
/// Dotted key of the creation-time path template.
pub const PATH_KEY: &str = "main.path";

/// Read access to a spec, implemented by raw specs and by records.
pub trait SpecSource {
    fn spec(&self) -> &Spec;
}

/// Write access to a spec.
pub trait SpecTarget: SpecSource {
    fn spec_mut(&mut self) -> &mut Spec;
}

impl SpecSource for Spec {
    fn spec(&self) -> &Spec {
        self
    }
}

impl SpecTarget for Spec {
    fn spec_mut(&mut self) -> &mut Spec {
        self
    }
}

/// Declared type name from `main.class`, if the spec carries one.
///
/// A non-string value cannot name a registered type and is reported as
/// unknown rather than ignored.
pub fn declared_type(spec: &Spec) -> Result<Option<&str>> {
    let Some(value) = spec.get(MAIN).and_then(|main| main.get("class")) else {
        return Ok(None);
    };
    match value {
        Value::String(name) => Ok(Some(name.as_str())),
        other => Err(DatError::UnknownType {
            name: other.to_string(),
        }),
    }
}

/// Creation template from `main.path`, if present and a string.
pub fn declared_template(spec: &Spec) -> Option<&str> {
    spec.get(MAIN)
        .and_then(|main| main.get("path"))
        .and_then(Value::as_str)
}
