//! Core pattern types: matches, per-password collections, and the finder contract.

use std::fmt;

/// Category of a recognized pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    Horizontal,
    Diagonal,
    Repeated,
    Date,
    Dictionary,
    Random,
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternCategory::Horizontal => "HORIZONTAL",
            PatternCategory::Diagonal => "DIAGONAL",
            PatternCategory::Repeated => "REPEATED",
            PatternCategory::Date => "DATE",
            PatternCategory::Dictionary => "DICTIONARY",
            PatternCategory::Random => "RANDOM",
        };
        f.write_str(name)
    }
}

/// One recognized substring of a password and the size of the guess space an
/// attacker must cover for this category of pattern.
///
/// `start` and `length` count characters, not bytes. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    start: usize,
    length: usize,
    text: String,
    weight: f64,
    category: PatternCategory,
    description: String,
    source: String,
}

impl PatternMatch {
    /// Creates a new match. A weight below 1 is clamped to 1 so a degenerate
    /// finder cannot erase a segment's contribution to the path cost.
    pub fn new(
        start: usize,
        length: usize,
        text: impl Into<String>,
        weight: f64,
        category: PatternCategory,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        debug_assert!(length > 0, "zero-length pattern match");
        Self {
            start,
            length,
            text: text.into(),
            weight: if weight < 1.0 { 1.0 } else { weight },
            category,
            description: description.into(),
            source: source.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Exclusive end index of the matched span.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn category(&self) -> PatternCategory {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Provenance of the match: keyboard layout name, word-list name, or
    /// character-class summary for random runs.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Unordered bag of candidate matches found in one password.
///
/// Duplicates and overlapping spans are allowed; reconciling them into a
/// single non-overlapping path is the optimizer's job, not the collection's.
#[derive(Debug, Clone)]
pub struct MatchCollection<'p> {
    password: &'p str,
    matches: Vec<PatternMatch>,
}

impl<'p> MatchCollection<'p> {
    pub fn new(password: &'p str) -> Self {
        Self {
            password,
            matches: Vec::new(),
        }
    }

    /// The exact password text this collection was built from.
    pub fn password(&self) -> &'p str {
        self.password
    }

    pub fn add(&mut self, pattern: PatternMatch) {
        self.matches.push(pattern);
    }

    /// Unions another collection into this one. Both must refer to the same
    /// password under analysis.
    pub fn merge(&mut self, other: MatchCollection<'p>) {
        debug_assert_eq!(
            self.password, other.password,
            "merging collections from different passwords"
        );
        self.matches.extend(other.matches);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternMatch> {
        self.matches.iter()
    }
}

/// A producer of candidate matches.
///
/// Implementations must be pure functions of the password and their own
/// immutable data: repeated calls on the same input yield identical
/// collections, and nothing shared is mutated, so independent finders may run
/// concurrently on different passwords or on the same one.
pub trait PatternFinder: Send + Sync {
    fn search<'p>(&self, password: &'p str) -> MatchCollection<'p>;
}
