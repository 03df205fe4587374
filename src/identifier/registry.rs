//! Run-scoped set of issued identifiers.

use chrono::Utc;
use std::collections::HashSet;

use super::{truncate, MAX_IDENTIFIER_LENGTH};

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Identifiers issued so far in one run
///
/// Created once per run by the caller and passed by `&mut` into every
/// synthesis call. Collisions are resolved with a `_{unix-timestamp}-{NNN}`
/// suffix, so output is only reproducible when no collision occurs.
#[derive(Debug, Clone)]
pub struct IdentifierRegistry {
    issued: HashSet<String>,
    clock: fn() -> i64,
}

impl Default for IdentifierRegistry {
    fn default() -> Self {
        Self {
            issued: HashSet::new(),
            clock: unix_now,
        }
    }
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a custom timestamp source for collision suffixes
    pub fn with_clock(clock: fn() -> i64) -> Self {
        Self {
            issued: HashSet::new(),
            clock,
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.issued.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// Claim `candidate`, or the first free suffixed variant of it.
    ///
    /// The check and the insert happen under the same `&mut` borrow, so an
    /// identifier can never be handed out twice.
    pub fn claim(&mut self, candidate: String) -> String {
        let mut identifier = candidate.clone();
        let mut counter: u32 = 1;

        while self.issued.contains(&identifier) {
            let suffix = format!("_{}-{:03}", (self.clock)(), counter);
            let room = MAX_IDENTIFIER_LENGTH.saturating_sub(suffix.chars().count());
            identifier = format!("{}{}", truncate(&candidate, room), suffix);
            counter += 1;
        }

        tracing::debug!(identifier = %identifier, retries = counter - 1, "Issued identifier");
        self.issued.insert(identifier.clone());
        identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_is_verbatim() {
        let mut registry = IdentifierRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.claim("abc".to_string()), "abc");
        assert!(registry.contains("abc"));
    }

    #[test]
    fn test_suffix_skips_taken_variants() {
        let mut registry = IdentifierRegistry::with_clock(|| 42);
        registry.claim("abc".to_string());
        registry.claim("abc_42-001".to_string());

        assert_eq!(registry.claim("abc".to_string()), "abc_42-002");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_suffix_fits_length_bound() {
        let mut registry = IdentifierRegistry::with_clock(|| 1_700_000_000);
        let long = "k".repeat(MAX_IDENTIFIER_LENGTH);
        registry.claim(long.clone());

        let second = registry.claim(long);
        assert_eq!(second.chars().count(), MAX_IDENTIFIER_LENGTH);
        assert!(second.ends_with("_1700000000-001"));
    }

    #[test]
    fn test_registries_do_not_share_state() {
        let mut first = IdentifierRegistry::new();
        let mut second = IdentifierRegistry::new();
        assert_eq!(first.claim("x".to_string()), "x");
        assert_eq!(second.claim("x".to_string()), "x");
    }
}
