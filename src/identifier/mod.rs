//! Identifier synthesis.
//!
//! Every output record receives an identifier of the form
//! `{prefix}_{date}_{core}` restricted to `[A-Za-z0-9_-]`, at most
//! [`MAX_IDENTIFIER_LENGTH`] characters long and unique within the run.
//! Uniqueness is owned by an [`IdentifierRegistry`] that the caller passes
//! into every synthesis call; there is no process-wide state.

mod registry;

use std::path::Path;

use crate::record::{non_empty, Record};
use crate::template::Template;
use crate::validation::{is_valid_date, patterns::IDENTIFIER_DATE_FROM_RECORD};

pub use registry::IdentifierRegistry;

/// Hard upper bound on identifier length, suffixes included
pub const MAX_IDENTIFIER_LENGTH: usize = 80;

/// Fallback core when a record has neither identifier nor file
const DEFAULT_CORE: &str = "item";

/// Preferred cut points, most specific first
const TRUNCATION_DELIMITERS: &[&str] = &["-_-", "_-_", "-", "_"];

/// Replace spaces with `_` and drop everything outside `[A-Za-z0-9_-]`.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Shorten an identifier to at most `max_length` characters.
///
/// Cuts at the rightmost delimiter that lies wholly inside the limit, trying
/// `-_-`, `_-_`, `-` and `_` in that order, and falls back to a hard cut.
/// A delimiter at position 0 does not count. Applying it twice is a no-op.
pub fn truncate(identifier: &str, max_length: usize) -> String {
    let limit = match identifier.char_indices().nth(max_length) {
        Some((byte_index, _)) => byte_index,
        None => return identifier.to_string(),
    };
    let window = &identifier[..limit];

    for delimiter in TRUNCATION_DELIMITERS {
        if let Some(cut) = window.rfind(delimiter) {
            if cut > 0 {
                return identifier[..cut].to_string();
            }
        }
    }

    window.to_string()
}

/// Date segment for a record.
///
/// `TRUE` (any case) selects the record's own `date` when it matches the
/// date grammar and yields nothing otherwise; any other directive is used
/// verbatim. An unusable record date deliberately drops the segment rather
/// than writing the literal `TRUE` into the identifier.
fn date_part<'a>(record: &'a Record, identifier_date: &'a str) -> &'a str {
    let directive = identifier_date.trim();
    if directive.eq_ignore_ascii_case(IDENTIFIER_DATE_FROM_RECORD) {
        non_empty(record, "date")
            .filter(|date| is_valid_date(date))
            .unwrap_or_default()
    } else {
        directive
    }
}

/// Per-record base name: the record's identifier, else its file stem.
fn base_id(record: &Record) -> String {
    let base = if let Some(identifier) = non_empty(record, "identifier") {
        sanitize(identifier)
    } else if let Some(file) = non_empty(record, "file") {
        Path::new(file)
            .file_stem()
            .map(|stem| sanitize(&stem.to_string_lossy()))
            .unwrap_or_default()
    } else {
        String::new()
    };

    if base.is_empty() {
        DEFAULT_CORE.to_string()
    } else {
        base
    }
}

/// Build the bounded candidate identifier before collision handling.
pub fn candidate(record: &Record, template: &Template, identifier_date: &str) -> String {
    let base = base_id(record);
    let basename = template.identifier_basename();
    let core = basename.unwrap_or(base.as_str());

    let mut segments = vec![template.identifier_prefix(), date_part(record, identifier_date), core];
    if basename.is_none() && base != core {
        segments.push(base.as_str());
    }

    let joined = segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    truncate(&sanitize(&joined), MAX_IDENTIFIER_LENGTH)
}

/// Derive a unique identifier for the record and claim it in the registry.
pub fn synthesize(
    record: &Record,
    template: &Template,
    identifier_date: &str,
    registry: &mut IdentifierRegistry,
) -> String {
    registry.claim(candidate(record, template, identifier_date))
}
