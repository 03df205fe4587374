//! Output column ordering.

use indexmap::IndexSet;

use crate::record::{parse_indexed_column, Record};
use crate::template::is_control_field;

/// Always first, in this order
const LEADING_COLUMNS: &[&str] = &["identifier", "file", "mediatype"];

/// Emitted between the collection and subject columns
const DESCRIPTIVE_COLUMNS: &[&str] = &["title", "date", "creator", "description"];

/// Bare multi-value columns that must already be in indexed form
const UNRESOLVED_COLUMNS: &[&str] = &["subject", "subjects", "keywords", "collection", "collections"];

fn indexed_columns(records: &[Record], field: &str) -> Vec<String> {
    let mut indices: Vec<(usize, &str)> = records
        .iter()
        .flat_map(|record| record.keys())
        .filter_map(|column| match parse_indexed_column(column) {
            Some((name, index)) if name == field => Some((index, column.as_str())),
            _ => None,
        })
        .collect();
    indices.sort_by_key(|(index, _)| *index);
    indices.dedup_by_key(|(index, _)| *index);
    indices.into_iter().map(|(_, column)| column.to_string()).collect()
}

fn is_planned_elsewhere(column: &str) -> bool {
    if LEADING_COLUMNS.contains(&column) || DESCRIPTIVE_COLUMNS.contains(&column) {
        return true;
    }
    if matches!(parse_indexed_column(column), Some(("collection", _)) | Some(("subject", _))) {
        return true;
    }
    is_control_field(column) || UNRESOLVED_COLUMNS.contains(&column.to_lowercase().as_str())
}

/// Final header for a set of merged records.
///
/// `identifier, file, mediatype`, the `collection[n]` columns, `title, date,
/// creator, description`, the `subject[n]` columns, then every other column
/// in the order it was first seen across the records.
pub fn plan_columns(records: &[Record]) -> Vec<String> {
    let mut columns: IndexSet<String> = IndexSet::new();

    columns.extend(LEADING_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(indexed_columns(records, "collection"));
    columns.extend(DESCRIPTIVE_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(indexed_columns(records, "subject"));

    for column in records.iter().flat_map(|record| record.keys()) {
        if !is_planned_elsewhere(column) {
            columns.insert(column.clone());
        }
    }

    columns.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(columns: &[&str]) -> Record {
        columns
            .iter()
            .map(|c| (c.to_string(), String::new()))
            .collect()
    }

    #[test]
    fn test_end_to_end_ordering() {
        let records = vec![record(&[
            "identifier",
            "file",
            "mediatype",
            "subject[0]",
            "subject[1]",
            "title",
            "date",
            "creator",
            "description",
            "extra1",
        ])];

        assert_eq!(
            plan_columns(&records),
            vec![
                "identifier",
                "file",
                "mediatype",
                "title",
                "date",
                "creator",
                "description",
                "subject[0]",
                "subject[1]",
                "extra1",
            ]
        );
    }

    #[test]
    fn test_collections_sorted_numerically_across_sparse_records() {
        let records = vec![
            record(&["identifier", "collection[0]", "language[0]", "notes"]),
            record(&["identifier", "collection[10]", "collection[2]", "collection[0]", "volume"]),
        ];

        let columns = plan_columns(&records);
        assert_eq!(
            columns,
            vec![
                "identifier",
                "file",
                "mediatype",
                "collection[0]",
                "collection[2]",
                "collection[10]",
                "title",
                "date",
                "creator",
                "description",
                "language[0]",
                "notes",
                "volume",
            ]
        );
    }

    #[test]
    fn test_bare_and_control_columns_excluded() {
        let records = vec![record(&[
            "identifier",
            "Keywords",
            "subjects",
            "collection",
            "identifier-prefix",
            "identifier_basename",
            "publisher",
        ])];

        let columns = plan_columns(&records);
        assert_eq!(columns.last().map(String::as_str), Some("publisher"));
        assert!(!columns.iter().any(|c| c == "Keywords" || c == "identifier-prefix"));
    }

    #[test]
    fn test_no_records_still_has_fixed_header() {
        assert_eq!(plan_columns(&[]).len(), 7);
    }
}
