//! Record Merge Engine
//!
//! Turns one raw input record into one fully resolved output record. The
//! same merge runs for plain rows, for directory rows folded back in as a
//! single `data` item, and for each member of an expanded directory.

pub mod classify;
pub mod repeatable;

use std::path::Path;

use crate::identifier::{self, IdentifierRegistry};
use crate::record::{non_empty, normalize_field_names, Record};
use crate::template::{is_control_field, is_repeatable_candidate, Template};

pub use classify::{classify, Mediatype};

/// `mediatype` directive asking for classification from the file reference
pub const DETECT: &str = "DETECT";

/// Always resolved into indexed columns, whatever the template declares
const ALWAYS_REPEATABLE: &[&str] = &["subject", "collection"];

/// Merges records against a shared, read-only template
#[derive(Debug, Clone, Copy)]
pub struct RecordMerger<'a> {
    template: &'a Template,
}

impl<'a> RecordMerger<'a> {
    pub fn new(template: &'a Template) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &'a Template {
        self.template
    }

    /// Produce the fully merged form of `record` and claim its identifier.
    pub fn merge(&self, record: Record, registry: &mut IdentifierRegistry) -> Record {
        let mut record = normalize_field_names(record);

        self.fill_defaults(&mut record);
        resolve_mediatype(&mut record);
        self.expand_repeatable_fields(&mut record);
        strip_control_fields(&mut record);

        let identifier = identifier::synthesize(
            &record,
            self.template,
            self.template.identifier_date(),
            registry,
        );
        record.insert("identifier".to_string(), identifier);

        record
    }

    /// Fill template defaults into absent or empty fields.
    ///
    /// A non-empty record value always wins. `identifier`, control fields,
    /// repeatable lists and `subject`/`collection` are left to later steps.
    fn fill_defaults(&self, record: &mut Record) {
        for (name, value) in self.template.iter() {
            if name == "identifier" || is_control_field(name) {
                continue;
            }
            if (value.is_list() && is_repeatable_candidate(name))
                || ALWAYS_REPEATABLE.contains(&name)
            {
                continue;
            }
            if non_empty(record, name).is_none() {
                record.insert(name.to_string(), value.as_cell());
            }
        }
    }

    /// Resolve every repeatable field into indexed columns.
    ///
    /// `subject` and `collection` are resolved even when the template does
    /// not list them, so bare record columns never leak into the output. A
    /// scalar template value then acts as a single default.
    fn expand_repeatable_fields(&self, record: &mut Record) {
        for (field, defaults) in self.template.repeatable_fields() {
            repeatable::apply(record, field, defaults);
        }

        for field in ALWAYS_REPEATABLE {
            if self.template.repeatable_fields().any(|(name, _)| name == *field) {
                continue;
            }
            let defaults: Vec<String> = self
                .template
                .scalar(field)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| vec![value.to_string()])
                .unwrap_or_default();
            if defaults.is_empty() && !repeatable::has_sources(record, field) {
                continue;
            }
            repeatable::apply(record, field, &defaults);
        }
    }
}

/// Replace a `DETECT` mediatype with the classification of the record's file.
///
/// Directories and missing file references classify as `data`.
fn resolve_mediatype(record: &mut Record) {
    let wants_detection = non_empty(record, "mediatype")
        .map(|value| value.eq_ignore_ascii_case(DETECT))
        .unwrap_or(false);
    if !wants_detection {
        return;
    }

    let mediatype = match non_empty(record, "file") {
        Some(file) if !Path::new(file).is_dir() => classify(file),
        _ => Mediatype::Data,
    };
    record.insert("mediatype".to_string(), mediatype.as_str().to_string());
}

fn strip_control_fields(record: &mut Record) {
    record.retain(|name, _| !is_control_field(name));
}
