//! Utility functions for the tournament engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of match and group identifiers
///
/// Builders never invent ids themselves so that callers can choose between
/// reproducible sequences (tests, replays) and globally unique ids.
pub trait IdGenerator {
    /// Produce the next id for the given scope, e.g. `rr-r1-m2`
    fn next_id(&mut self, scope: &str) -> String;
}

/// Deterministic `{scope}-{n}` ids
#[derive(Debug, Clone, Default)]
pub struct SequenceIdGenerator {
    next: u64,
}

impl SequenceIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from a given value
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&mut self, scope: &str) -> String {
        self.next += 1;
        format!("{}-{}", scope, self.next)
    }
}

/// `{scope}-{uuid}` ids, unique across processes
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self, scope: &str) -> String {
        format!("{}-{}", scope, Uuid::new_v4())
    }
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Group label for a zero-based index: A, B, ... Z, then 27, 28, ...
pub fn group_letter(index: usize) -> String {
    if index < 26 {
        ((b'A' + index as u8) as char).to_string()
    } else {
        (index + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ids_are_reproducible() {
        let mut first = SequenceIdGenerator::new();
        let mut second = SequenceIdGenerator::new();
        assert_eq!(first.next_id("rr-r1-m1"), "rr-r1-m1-1");
        assert_eq!(first.next_id("rr-r1-m2"), "rr-r1-m2-2");
        assert_eq!(second.next_id("rr-r1-m1"), "rr-r1-m1-1");
    }

    #[test]
    fn test_sequence_starting_at() {
        let mut ids = SequenceIdGenerator::starting_at(41);
        assert_eq!(ids.next_id("x"), "x-42");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let mut ids = UuidIdGenerator;
        let a = ids.next_id("swiss-r1-m1");
        let b = ids.next_id("swiss-r1-m1");
        assert_ne!(a, b);
        assert!(a.starts_with("swiss-r1-m1-"));
    }

    #[test]
    fn test_group_letter() {
        assert_eq!(group_letter(0), "A");
        assert_eq!(group_letter(2), "C");
        assert_eq!(group_letter(25), "Z");
        assert_eq!(group_letter(26), "27");
    }
}
