//! Spec file encoding (`_spec_.yaml`).
//!
//! Specs are written as YAML. JSON is a YAML subset, so hand-written JSON spec
//! files load as well.

use std::io;
use std::path::Path;

use serde_json::Value;

use crate::core::spec::Spec;
use crate::error::{DatError, Result};

/// Name of the spec file inside every record directory.
pub const SPEC_FILE: &str = "_spec_.yaml";

pub fn encode(spec: &Spec, path: &Path) -> Result<String> {
    serde_yaml::to_string(spec).map_err(|err| DatError::write(path, io::Error::other(err)))
}

/// Decode spec file contents. An empty document is an empty spec.
pub fn decode(text: &str, path: &Path) -> Result<Spec> {
    if text.trim().is_empty() {
        return Ok(Spec::new());
    }
    let value: Value = serde_yaml::from_str(text).map_err(|err| DatError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    match value {
        Value::Object(spec) => Ok(spec),
        Value::Null => Ok(Spec::new()),
        other => Err(DatError::Decode {
            path: path.to_path_buf(),
            message: format!("top level must be a mapping, found {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
