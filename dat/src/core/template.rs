//! Path templates with `{YY}`, `{MM}` and `{unique}` placeholders.
//!
//! Parsing and rendering are pure. Probing the filesystem for a free
//! `{unique}` candidate lives in `io::resolve`.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{DatError, Result};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Two-digit year.
    Year,
    /// Two-digit month.
    Month,
    Unique,
}

/// A parsed path template. Only recognized placeholders survive parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let unresolved = |placeholder: &str| DatError::UnresolvedPlaceholder {
            template: source.to_string(),
            placeholder: placeholder.to_string(),
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in PLACEHOLDER_RE.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_literal(&mut segments, &source[last..whole.start()], unresolved)?;
            let segment = match &caps[1] {
                "YY" => Segment::Year,
                "MM" => Segment::Month,
                "unique" => Segment::Unique,
                _ => return Err(unresolved(whole.as_str())),
            };
            segments.push(segment);
            last = whole.end();
        }
        push_literal(&mut segments, &source[last..], unresolved)?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// True when `text` carries any placeholder syntax and must be resolved.
    pub fn is_template(text: &str) -> bool {
        text.contains('{') || text.contains('}')
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn has_unique(&self) -> bool {
        self.segments.contains(&Segment::Unique)
    }

    /// Text before the first placeholder.
    pub fn literal_prefix(&self) -> &str {
        match self.segments.first() {
            Some(Segment::Literal(text)) => text,
            _ => "",
        }
    }

    /// Render for `date`. Attempt 0 renders `{unique}` as nothing; attempt `n`
    /// renders it as `_n`.
    pub fn render(&self, date: NaiveDate, attempt: u32) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Year => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
                Segment::Month => out.push_str(&format!("{:02}", date.month())),
                Segment::Unique if attempt == 0 => {}
                Segment::Unique => out.push_str(&format!("_{attempt}")),
            }
        }
        out
    }
}

fn push_literal<F>(segments: &mut Vec<Segment>, text: &str, unresolved: F) -> Result<()>
where
    F: Fn(&str) -> DatError,
{
    // A brace left over after placeholder extraction is unbalanced syntax.
    if let Some(stray) = text.chars().find(|c| *c == '{' || *c == '}') {
        return Err(unresolved(&stray.to_string()));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}
