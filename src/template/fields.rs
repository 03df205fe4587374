//! Reserved field names shared by the template, merge and column planner.

/// Template-only directive controlling the date segment of identifiers
pub const IDENTIFIER_DATE: &str = "identifier-date";

/// Identifier prefix, underscore spelling checked first
pub const IDENTIFIER_PREFIX_KEYS: &[&str] = &["identifier_prefix", "identifier-prefix"];

/// Identifier basename override, underscore spelling checked first
pub const IDENTIFIER_BASENAME_KEYS: &[&str] = &["identifier_basename", "identifier-basename"];

/// Control fields drive identifier synthesis and never reach the output
pub const CONTROL_FIELDS: &[&str] = &[
    IDENTIFIER_DATE,
    "identifier_prefix",
    "identifier-prefix",
    "identifier_basename",
    "identifier-basename",
];

/// Fields that are never expanded into indexed columns, even when the
/// template declares them as a list.
pub const NON_REPEATABLE_FIELDS: &[&str] = &[
    "identifier",
    "file",
    "mediatype",
    "color",
    "date",
    "licenseurl",
    "rights",
    "rights-statement",
    "publisher",
    "summary",
    "ai-note",
    "ai-summary",
    "title",
    "volume",
    "year",
    "issue",
];

/// Canonical spelling for the rights statement column
pub const RIGHTS_STATEMENT: &str = "rights-statement";

/// Separator used for multi-value text cells
pub const LIST_DELIMITER: char = ';';

pub fn is_control_field(name: &str) -> bool {
    CONTROL_FIELDS.contains(&name)
}

/// Whether a template field of list type may be expanded into indexed columns.
pub fn is_repeatable_candidate(name: &str) -> bool {
    !NON_REPEATABLE_FIELDS.contains(&name) && !is_control_field(name)
}

/// Collapse case/separator variants of `rights-statement` into the canonical name.
///
/// `RightsStatement`, `rights_statement` and `rightsstatement` all map to
/// `rights-statement`; every other name is returned unchanged.
pub fn normalize_field_name(name: &str) -> String {
    let squashed: String = name
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();

    if squashed == "rightsstatement" {
        RIGHTS_STATEMENT.to_string()
    } else {
        name.to_string()
    }
}
