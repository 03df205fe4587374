//! Canonical acceptance patterns for dates, URLs and rights vocabularies.

use once_cell::sync::Lazy;
use regex::Regex;

/// YYYY, YYYY-MM or YYYY-MM-DD, with `x` standing in for unknown digits
static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}[0-9x]{2}(-[0-9x]{2}){0,2}$").expect("Invalid regex"));

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://\S+$").expect("Invalid regex"));

/// Current Creative Commons licenses and public-domain dedications
static CREATIVE_COMMONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://creativecommons\.org/(licenses|publicdomain)/[a-z\-]+/[0-9.]+/?$")
        .expect("Invalid regex")
});

/// The twelve RightsStatements.org 1.0 statements
static RIGHTS_STATEMENTS_ORG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://rightsstatements\.org/vocab/(InC|InC-OW-EU|InC-EDU|InC-NC|InC-RUU|NoC-CR|NoC-NC|NoC-OKLR|NoC-US|CNE|UND|NKC)/1\.0/?$",
    )
    .expect("Invalid regex")
});

/// Values accepted for `mediatype`, besides the `DETECT` directive
pub const MEDIATYPES: &[&str] = &["movies", "audio", "texts", "software", "image", "data"];

/// Literal `identifier-date` value meaning "use the record's own date"
pub const IDENTIFIER_DATE_FROM_RECORD: &str = "TRUE";

pub fn is_valid_date(value: &str) -> bool {
    DATE.is_match(value)
}

pub fn is_valid_url(value: &str) -> bool {
    URL.is_match(value)
}

pub fn is_valid_licenseurl(value: &str) -> bool {
    CREATIVE_COMMONS.is_match(value)
}

pub fn is_valid_rights_statement(value: &str) -> bool {
    RIGHTS_STATEMENTS_ORG.is_match(value) || CREATIVE_COMMONS.is_match(value)
}

/// A date, or the `TRUE` flag in any letter case
pub fn is_valid_identifier_date(value: &str) -> bool {
    is_valid_date(value) || value.eq_ignore_ascii_case(IDENTIFIER_DATE_FROM_RECORD)
}

pub fn is_known_mediatype(value: &str) -> bool {
    MEDIATYPES.contains(&value) || value.eq_ignore_ascii_case("DETECT")
}
