//! Identifier generation for protocol documents.
//!
//! SAML identifiers must be unpredictable and must not start with a digit, so
//! the production generator prefixes a random UUID with an underscore.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of document identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier.
    fn next_id(&self) -> String;
}

/// Generates `_` followed by a random v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        format!("_{}", Uuid::new_v4())
    }
}

/// Deterministic generator yielding `{prefix}1`, `{prefix}2`, ...
///
/// Intended for tests and reproducible fixtures.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("_id")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_ids_start_with_underscore() {
        let id = RandomIdGenerator.next_id();
        assert!(id.starts_with('_'));
        assert_eq!(id.len(), 37);
    }

    #[test]
    fn random_ids_are_unique() {
        let ids: HashSet<String> = (0..100).map(|_| RandomIdGenerator.next_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::new("_t");
        assert_eq!(ids.next_id(), "_t1");
        assert_eq!(ids.next_id(), "_t2");
        assert_eq!(ids.next_id(), "_t3");
    }
}
