//! Record type and field-name helpers.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::template::normalize_field_name;

/// One row of the batch: field name to cell text, in encounter order
pub type Record = IndexMap<String, String>;

static INDEXED_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\[(\d+)\]$").expect("Invalid regex"));

/// Split an indexed column name such as `subject[2]` into `("subject", 2)`.
pub fn parse_indexed_column(name: &str) -> Option<(&str, usize)> {
    let caps = INDEXED_COLUMN.captures(name)?;
    let field = caps.get(1)?.as_str();
    let index = caps.get(2)?.as_str().parse().ok()?;
    Some((field, index))
}

pub fn indexed_column(field: &str, index: usize) -> String {
    format!("{}[{}]", field, index)
}

/// Value of a field, treating empty or whitespace-only text as absent.
pub fn non_empty<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Rename field-name variants to their canonical spelling.
///
/// When two variants collide the later column wins, unless its value is
/// empty and an earlier one is not.
pub fn normalize_field_names(record: Record) -> Record {
    let mut normalized = Record::with_capacity(record.len());
    for (name, value) in record {
        let name = normalize_field_name(&name);
        match normalized.get(&name) {
            Some(existing) if !existing.is_empty() && value.is_empty() => {}
            _ => {
                normalized.insert(name, value);
            }
        }
    }
    normalized
}
