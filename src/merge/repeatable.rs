//! Repeatable-field resolution.
//!
//! A repeatable field can arrive on a record as indexed columns
//! (`subject[0]`, `subject[1]`, ...) or as a single `;`-separated cell
//! (`subject`, `subjects`, and `keywords` for subjects). Resolution is split
//! into a pure read ([`record_values`] / [`merge_values`]) and the explicit
//! mutations ([`strip_sources`] / [`materialize`]) composed by the merge engine.

use std::collections::HashSet;

use crate::record::{indexed_column, parse_indexed_column, Record};
use crate::template::LIST_DELIMITER;

/// Whether a bare (non-indexed) column carries values for `field`
fn is_bare_source(column: &str, field: &str) -> bool {
    let column = column.to_lowercase();
    let field = field.to_lowercase();
    column == field || column == format!("{}s", field) || (field == "subject" && column == "keywords")
}

fn is_indexed_source(column: &str, field: &str) -> bool {
    matches!(parse_indexed_column(column), Some((name, _)) if name == field)
}

fn split_cell(cell: &str) -> impl Iterator<Item = String> + '_ {
    cell.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
}

/// Values the record itself supplies for `field`, in encounter order.
///
/// Indexed columns take precedence and are read in numeric index order.
/// Without them, every bare source column is split on `;`.
pub fn record_values(record: &Record, field: &str) -> Vec<String> {
    let mut indexed: Vec<(usize, &str)> = record
        .iter()
        .filter_map(|(column, value)| match parse_indexed_column(column) {
            Some((name, index)) if name == field => Some((index, value.as_str())),
            _ => None,
        })
        .collect();

    if !indexed.is_empty() {
        indexed.sort_by_key(|(index, _)| *index);
        return indexed
            .into_iter()
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
    }

    record
        .iter()
        .filter(|(column, _)| is_bare_source(column, field))
        .flat_map(|(_, value)| split_cell(value))
        .collect()
}

/// Template defaults first, then record values; trimmed, empty entries
/// dropped, first occurrence of each value kept.
pub fn merge_values<I>(template_values: &[String], record_values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    template_values
        .iter()
        .map(|value| value.trim().to_string())
        .chain(record_values.into_iter().map(|value| value.trim().to_string()))
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Whether the record carries `field` in indexed or bare form.
pub fn has_sources(record: &Record, field: &str) -> bool {
    record
        .keys()
        .any(|column| is_indexed_source(column, field) || is_bare_source(column, field))
}

/// Remove every source representation of `field` from the record.
pub fn strip_sources(record: &mut Record, field: &str) {
    record.retain(|column, _| !is_indexed_source(column, field) && !is_bare_source(column, field));
}

/// Write `values` back as `field[0]`, `field[1]`, ...
pub fn materialize(record: &mut Record, field: &str, values: &[String]) {
    for (index, value) in values.iter().enumerate() {
        record.insert(indexed_column(field, index), value.clone());
    }
}

/// Resolve `field` on the record against its template defaults, replacing
/// the source columns with indexed ones. Returns the resolved values.
pub fn apply(record: &mut Record, field: &str, template_values: &[String]) -> Vec<String> {
    let values = merge_values(template_values, record_values(record, field));
    strip_sources(record, field);
    materialize(record, field, &values);
    values
}
