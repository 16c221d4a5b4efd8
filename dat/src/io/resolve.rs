//! Resolve record paths against the store root.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::core::template::Template;
use crate::error::{DatError, Result};

/// Expand `text` into a literal, placeholder-free record path.
///
/// Plain paths are only normalized. Templates are rendered for `today`; when
/// they carry `{unique}`, candidates are probed under `root` until one does
/// not exist, giving up after `max_attempts` with `AlreadyExists`.
///
/// The probe does not reserve anything. A concurrent creator can still claim
/// the same candidate before the first save, which then reports
/// `AlreadyExists`.
pub fn resolve_path(
    root: &Path,
    text: &str,
    today: NaiveDate,
    max_attempts: u32,
) -> Result<PathBuf> {
    if !Template::is_template(text) {
        return Ok(clean_path(Path::new(text)));
    }
    let template = Template::parse(text)?;
    if !template.has_unique() {
        return Ok(clean_path(Path::new(&template.render(today, 0))));
    }

    let mut candidate = PathBuf::new();
    for attempt in 0..max_attempts {
        candidate = clean_path(Path::new(&template.render(today, attempt)));
        if !location(root, &candidate).exists() {
            debug!(template = text, path = %candidate.display(), attempt, "resolved unique path");
            return Ok(candidate);
        }
    }
    Err(DatError::AlreadyExists { path: candidate })
}

/// Directory backing `path`: absolute paths as-is, relative ones under `root`.
pub fn location(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Lexically normalize: drop `.` components and trailing separators.
pub fn clean_path(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
