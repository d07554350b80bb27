//! Analysis results: the chosen decomposition of a password and its cost.

use thiserror::Error;

use crate::pattern::PatternMatch;
use crate::random;

#[derive(Error, Debug, PartialEq)]
pub enum PatternError {
    #[error("pattern at {start}..{end} overlaps the path head starting at {head_start}")]
    OverlappingPattern {
        start: usize,
        end: usize,
        head_start: usize,
    },
}

/// The minimum-cost decomposition of one password.
///
/// The path is ordered by ascending start index, pairwise non-overlapping,
/// and contiguous from the first match to the end of the password. Any prefix
/// before the first match is charged as random characters by
/// [`total_cost`](Self::total_cost). `Clone` snapshots an in-progress
/// candidate during the search.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    password: String,
    path: Vec<PatternMatch>,
    cost: f64,
}

impl AnalysisResult {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            path: Vec::new(),
            cost: 1.0,
        }
    }

    /// Prepends a match to the path and folds its weight into the running
    /// cost. `None` is a no-op, letting a search step decline to consume a
    /// pattern without branching at the call site.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::OverlappingPattern`] when the match overlaps
    /// the current head of the path.
    pub fn add_pattern(&mut self, pattern: Option<PatternMatch>) -> Result<(), PatternError> {
        let Some(pattern) = pattern else {
            return Ok(());
        };
        if let Some(head) = self.path.first() {
            if pattern.end() > head.start() {
                return Err(PatternError::OverlappingPattern {
                    start: pattern.start(),
                    end: pattern.end(),
                    head_start: head.start(),
                });
            }
        }
        self.cost *= pattern.weight();
        self.path.insert(0, pattern);
        Ok(())
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// The chosen matches, ordered by start index.
    pub fn path(&self) -> &[PatternMatch] {
        &self.path
    }

    /// Cost of the path itself, ignoring any random prefix before the first
    /// match. An empty path costs the whole password as random characters.
    pub fn relative_cost(&self) -> f64 {
        if self.path.is_empty() {
            return random::run_cost(&self.password);
        }
        self.cost
    }

    /// Full search-space size: the relative cost times the random cost of
    /// the prefix preceding the first match.
    pub fn total_cost(&self) -> f64 {
        let Some(first) = self.path.first() else {
            return random::run_cost(&self.password);
        };
        let prefix: String = self.password.chars().take(first.start()).collect();
        random::run_cost(&prefix) * self.relative_cost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternCategory;

    fn word(start: usize, length: usize, weight: f64) -> PatternMatch {
        PatternMatch::new(
            start,
            length,
            "xyz",
            weight,
            PatternCategory::Dictionary,
            "test word",
            "test",
        )
    }

    #[test]
    fn test_empty_path_costs_whole_password_as_random() {
        let result = AnalysisResult::new("abcdef");
        assert_eq!(result.relative_cost(), random::run_cost("abcdef"));
        assert_eq!(result.total_cost(), random::run_cost("abcdef"));
        assert!(result.path().is_empty());
    }

    #[test]
    fn test_empty_password_costs_one() {
        let result = AnalysisResult::new("");
        assert_eq!(result.relative_cost(), 1.0);
        assert_eq!(result.total_cost(), 1.0);
    }

    #[test]
    fn test_add_pattern_none_is_noop() {
        let mut result = AnalysisResult::new("abcdef");
        result.add_pattern(None).unwrap();
        assert!(result.path().is_empty());
        assert_eq!(result.relative_cost(), random::run_cost("abcdef"));
    }

    #[test]
    fn test_add_pattern_prepends_and_multiplies() {
        let mut result = AnalysisResult::new("abcdef");
        result.add_pattern(Some(word(3, 3, 7.0))).unwrap();
        result.add_pattern(Some(word(0, 3, 5.0))).unwrap();
        assert_eq!(result.path().len(), 2);
        assert_eq!(result.path()[0].start(), 0);
        assert_eq!(result.path()[1].start(), 3);
        assert_eq!(result.relative_cost(), 35.0);
        assert_eq!(result.total_cost(), 35.0);
    }

    #[test]
    fn test_add_overlapping_pattern_fails() {
        let mut result = AnalysisResult::new("abcdef");
        result.add_pattern(Some(word(2, 4, 7.0))).unwrap();
        let err = result.add_pattern(Some(word(0, 3, 5.0))).unwrap_err();
        assert_eq!(
            err,
            PatternError::OverlappingPattern {
                start: 0,
                end: 3,
                head_start: 2,
            }
        );
        // failed insert must not disturb the path or the cost
        assert_eq!(result.path().len(), 1);
        assert_eq!(result.relative_cost(), 7.0);
    }

    #[test]
    fn test_total_cost_folds_random_prefix() {
        let mut result = AnalysisResult::new("ab1234");
        result.add_pattern(Some(word(2, 4, 50.0))).unwrap();
        assert_eq!(result.relative_cost(), 50.0);
        assert_eq!(result.total_cost(), random::run_cost("ab") * 50.0);
    }

    #[test]
    fn test_clone_snapshots_candidate() {
        let mut result = AnalysisResult::new("abcdef");
        result.add_pattern(Some(word(3, 3, 7.0))).unwrap();
        let mut snapshot = result.clone();
        snapshot.add_pattern(Some(word(0, 3, 5.0))).unwrap();
        assert_eq!(result.path().len(), 1);
        assert_eq!(snapshot.path().len(), 2);
        assert_eq!(result.relative_cost(), 7.0);
        assert_eq!(snapshot.relative_cost(), 35.0);
    }
}
