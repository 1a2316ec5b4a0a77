//! Qualification codes and the qualified-employee tally.
//!
//! Codes are opaque identifiers normalized to trimmed uppercase, so
//! `" cpr "` and `"CPR"` name the same qualification.
//!
//! The tally records, per registered code, how many employees hold it.
//! It is derived state: [`RosterBuilder`](crate::roster::RosterBuilder)
//! recomputes it from scratch for every roster.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized qualification code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct QualificationCode(String);

impl QualificationCode {
    /// Creates a code, trimming whitespace and uppercasing.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QualificationCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for QualificationCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for QualificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered qualification codes with their qualified-employee counts.
///
/// Remembers registration order so that scarcity ties resolve the same
/// way on every run.
#[derive(Debug, Clone, Default)]
pub struct QualificationTally {
    counts: HashMap<QualificationCode, usize>,
    order: Vec<QualificationCode>,
}

impl QualificationTally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a code with a zero count.
    ///
    /// Returns `false` if the code was already registered.
    pub fn register(&mut self, code: QualificationCode) -> bool {
        if self.counts.contains_key(&code) {
            return false;
        }
        self.counts.insert(code.clone(), 0);
        self.order.push(code);
        true
    }

    /// Whether a code has been registered.
    pub fn is_registered(&self, code: &QualificationCode) -> bool {
        self.counts.contains_key(code)
    }

    /// Adds one qualified employee to a registered code.
    ///
    /// Returns `false` (and changes nothing) for unregistered codes.
    pub fn increment(&mut self, code: &QualificationCode) -> bool {
        match self.counts.get_mut(code) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Number of qualified employees, or `None` if unregistered.
    pub fn count(&self, code: &QualificationCode) -> Option<usize> {
        self.counts.get(code).copied()
    }

    /// Codes with counts, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualificationCode, usize)> {
        self.order.iter().map(|code| (code, self.counts[code]))
    }

    /// Codes ordered by ascending count; ties keep registration order.
    pub fn by_scarcity(&self) -> Vec<(QualificationCode, usize)> {
        let mut sorted: Vec<(QualificationCode, usize)> = self
            .iter()
            .map(|(code, count)| (code.clone(), count))
            .collect();
        sorted.sort_by_key(|(_, count)| *count);
        sorted
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no codes are registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_normalization() {
        assert_eq!(QualificationCode::new("  cpr "), QualificationCode::new("CPR"));
        assert_eq!(QualificationCode::from("lifeguard").as_str(), "LIFEGUARD");
        assert_eq!(QualificationCode::new("wsi").to_string(), "WSI");

        let parsed: QualificationCode = serde_json::from_str(r#"" first aid ""#).unwrap();
        assert_eq!(parsed.as_str(), "FIRST AID");
    }

    #[test]
    fn test_register_and_increment() {
        let mut tally = QualificationTally::new();
        assert!(tally.register("A".into()));
        assert!(!tally.register("a".into()));
        assert_eq!(tally.len(), 1);

        assert!(tally.increment(&"A".into()));
        assert!(!tally.increment(&"B".into()));
        assert_eq!(tally.count(&"A".into()), Some(1));
        assert_eq!(tally.count(&"B".into()), None);
        assert!(!tally.is_registered(&"B".into()));
    }

    #[test]
    fn test_scarcity_order_is_stable() {
        let mut tally = QualificationTally::new();
        for code in ["B", "A", "C", "D"] {
            tally.register(code.into());
        }
        for _ in 0..5 {
            tally.increment(&"B".into());
        }
        tally.increment(&"A".into());
        tally.increment(&"C".into());

        let order: Vec<String> = tally
            .by_scarcity()
            .into_iter()
            .map(|(code, _)| code.as_str().to_string())
            .collect();
        // D has none, A and C tie at one (registration order), B has five
        assert_eq!(order, vec!["D", "A", "C", "B"]);
    }
}
