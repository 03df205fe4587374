//! Template Module
//!
//! A template is the reusable set of default metadata applied to every
//! record of a batch. Fields map either to a scalar default or to an ordered
//! list of defaults (a repeatable field). Control fields steer identifier
//! synthesis and are stripped from the output.

pub mod fields;

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{Result, TemplatizerError};

pub use fields::{
    is_control_field, is_repeatable_candidate, normalize_field_name, CONTROL_FIELDS,
    IDENTIFIER_DATE, LIST_DELIMITER, NON_REPEATABLE_FIELDS,
};

/// Field that every template must declare as a list
const REQUIRED_LIST_FIELD: &str = "subject";

/// A single template default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Scalar(String),
    List(Vec<String>),
}

impl TemplateValue {
    /// Render the value as a single cell.
    ///
    /// Lists declared on non-repeatable fields are joined with `;` so they
    /// survive a round trip through the repeatable resolver.
    pub fn as_cell(&self) -> String {
        match self {
            TemplateValue::Scalar(s) => s.clone(),
            TemplateValue::List(items) => items.join(&LIST_DELIMITER.to_string()),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TemplateValue::Scalar(s) => Some(s.as_str()),
            TemplateValue::List(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TemplateValue::List(_))
    }

    fn from_json(field: &str, value: Value) -> Self {
        match value {
            Value::Array(items) => {
                TemplateValue::List(items.into_iter().filter_map(json_to_text).collect())
            }
            Value::Object(_) => {
                tracing::warn!(field, "Template field holds a nested object; using its JSON text");
                TemplateValue::Scalar(value.to_string())
            }
            other => TemplateValue::Scalar(json_to_text(other).unwrap_or_default()),
        }
    }
}

fn json_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Read-only template shared by every stage of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    fields: IndexMap<String, TemplateValue>,
}

impl Template {
    /// Load and structurally validate a template from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TemplatizerError::TemplateNotFound(path.to_path_buf()));
        }

        let json = fs::read_to_string(path).map_err(|e| TemplatizerError::io(path, e))?;
        let template = Self::from_json_str(&json)?;

        tracing::debug!(
            path = %path.display(),
            fields = template.fields.len(),
            "Loaded template"
        );

        Ok(template)
    }

    /// Parse a template from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: IndexMap<String, Value> = serde_json::from_str(json)
            .map_err(|e| TemplatizerError::InvalidTemplate(format!("malformed JSON: {}", e)))?;

        let fields = raw
            .into_iter()
            .map(|(name, value)| {
                let value = TemplateValue::from_json(&name, value);
                (normalize_field_name(&name), value)
            })
            .collect();

        Self::from_fields(fields)
    }

    /// Build a template from already-typed fields.
    ///
    /// Fails when `subject` is missing or is not a list.
    pub fn from_fields(fields: IndexMap<String, TemplateValue>) -> Result<Self> {
        match fields.get(REQUIRED_LIST_FIELD) {
            None => Err(TemplatizerError::InvalidTemplate(
                "Template must contain a 'subject' field.".to_string(),
            )),
            Some(TemplateValue::Scalar(_)) => Err(TemplatizerError::InvalidTemplate(
                "Template 'subject' field must be a list (even if empty).".to_string(),
            )),
            Some(TemplateValue::List(_)) => Ok(Self { fields }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.fields.get(name)
    }

    /// Scalar value of a field, `None` for lists and absent fields
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TemplateValue::as_scalar)
    }

    /// All fields in template order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields expanded into indexed columns, in template order
    pub fn repeatable_fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().filter_map(|(name, value)| match value {
            TemplateValue::List(items) if is_repeatable_candidate(name) => {
                Some((name.as_str(), items.as_slice()))
            }
            _ => None,
        })
    }

    pub fn identifier_prefix(&self) -> &str {
        self.first_non_empty(fields::IDENTIFIER_PREFIX_KEYS)
            .unwrap_or_default()
    }

    /// Explicit identifier core, overriding the per-record base name
    pub fn identifier_basename(&self) -> Option<&str> {
        self.first_non_empty(fields::IDENTIFIER_BASENAME_KEYS)
    }

    /// Raw `identifier-date` directive: a date, `TRUE`, or empty
    pub fn identifier_date(&self) -> &str {
        self.scalar(IDENTIFIER_DATE).unwrap_or_default()
    }

    fn first_non_empty(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.scalar(key))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }
}
