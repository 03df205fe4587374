//! Syntactic metadata checks.
//!
//! Nothing in here is fatal. Every check yields a [`ValidationWarning`]
//! that is logged and counted, and the batch is processed regardless so a
//! partially invalid input still produces a best-effort output.

pub mod patterns;

use std::fmt;

use crate::record::Record;
use crate::template::{Template, TemplateValue, IDENTIFIER_DATE};

pub use patterns::{
    is_known_mediatype, is_valid_date, is_valid_identifier_date, is_valid_licenseurl,
    is_valid_rights_statement, is_valid_url,
};

/// Fields whose value must be a plain http(s) URL
const STATEMENT_URL_FIELDS: &[&str] = &[
    "inclusive-description-statement",
    "inclusive-language-statement",
];

/// Where a checked value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationContext {
    Template,
    /// Zero-based row index within the record batch
    Row(usize),
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationContext::Template => write!(f, "template"),
            ValidationContext::Row(index) => write!(f, "row {}", index + 1),
        }
    }
}

/// Advisory problem found in the template or a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    EmptyBatch,
    MissingIdentifierColumn,
    UnknownMediatype {
        value: String,
        context: ValidationContext,
    },
    InvalidRightsStatement {
        value: String,
        context: ValidationContext,
    },
    InvalidLicenseUrl {
        value: String,
        context: ValidationContext,
    },
    InvalidStatementUrl {
        field: String,
        value: String,
        context: ValidationContext,
    },
    InvalidDate {
        field: String,
        value: String,
        context: ValidationContext,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::EmptyBatch => write!(f, "CSV file is empty or has no valid rows."),
            ValidationWarning::MissingIdentifierColumn => {
                write!(f, "CSV is missing required fields: identifier")
            }
            ValidationWarning::UnknownMediatype { value, context } => write!(
                f,
                "Invalid mediatype '{}' in {}. Must be one of movies, audio, texts, software, image, data or DETECT.",
                value, context
            ),
            ValidationWarning::InvalidRightsStatement { value, context } => {
                write!(f, "Invalid rights-statement URL '{}' in {}", value, context)
            }
            ValidationWarning::InvalidLicenseUrl { value, context } => {
                write!(f, "Invalid licenseurl '{}' in {}", value, context)
            }
            ValidationWarning::InvalidStatementUrl {
                field,
                value,
                context,
            } => write!(f, "Invalid {} URL '{}' in {}", field, value, context),
            ValidationWarning::InvalidDate {
                field,
                value,
                context,
            } => write!(
                f,
                "Invalid {} '{}' in {}. Expected YYYY, YYYY-MM or YYYY-MM-DD with 'x' allowed for digits.",
                field, value, context
            ),
        }
    }
}

/// Check one field value. Empty values are never flagged.
fn check_field(name: &str, value: &str, context: ValidationContext) -> Option<ValidationWarning> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    match name {
        "mediatype" if !is_known_mediatype(value) => Some(ValidationWarning::UnknownMediatype {
            value: value.to_string(),
            context,
        }),
        "rights-statement" if !is_valid_rights_statement(value) => {
            Some(ValidationWarning::InvalidRightsStatement {
                value: value.to_string(),
                context,
            })
        }
        "licenseurl" if !is_valid_licenseurl(value) => Some(ValidationWarning::InvalidLicenseUrl {
            value: value.to_string(),
            context,
        }),
        "date" if !is_valid_date(value) => Some(ValidationWarning::InvalidDate {
            field: name.to_string(),
            value: value.to_string(),
            context,
        }),
        IDENTIFIER_DATE if !is_valid_identifier_date(value) => Some(ValidationWarning::InvalidDate {
            field: name.to_string(),
            value: value.to_string(),
            context,
        }),
        _ if STATEMENT_URL_FIELDS.contains(&name) && !is_valid_url(value) => {
            Some(ValidationWarning::InvalidStatementUrl {
                field: name.to_string(),
                value: value.to_string(),
                context,
            })
        }
        _ => None,
    }
}

/// Advisory checks over the template's scalar fields.
pub fn validate_template(template: &Template) -> Vec<ValidationWarning> {
    template
        .iter()
        .filter_map(|(name, value)| match value {
            TemplateValue::Scalar(s) => check_field(name, s, ValidationContext::Template),
            TemplateValue::List(_) => None,
        })
        .collect()
}

/// Advisory checks over a single record.
pub fn validate_record(record: &Record, context: ValidationContext) -> Vec<ValidationWarning> {
    record
        .iter()
        .filter_map(|(name, value)| check_field(name, value, context))
        .collect()
}

/// Batch-level checks followed by per-record checks, in row order.
pub fn validate_batch(headers: &[String], records: &[Record]) -> Vec<ValidationWarning> {
    if records.is_empty() {
        return vec![ValidationWarning::EmptyBatch];
    }

    let mut warnings = Vec::new();
    if !headers.iter().any(|h| h == "identifier") {
        warnings.push(ValidationWarning::MissingIdentifierColumn);
    }

    for (index, record) in records.iter().enumerate() {
        warnings.extend(validate_record(record, ValidationContext::Row(index)));
    }

    warnings
}

/// Log each warning and return how many were emitted.
pub fn emit(warnings: &[ValidationWarning]) -> usize {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    warnings.len()
}
