//! Minimum-cost path search over candidate matches.
//!
//! `best_from(i)` is the cheapest cost of decomposing the password suffix
//! starting at character `i`, computed backward over an arena indexed by
//! position. A suffix either begins with a candidate match starting at `i`,
//! or with a single random gap run that ends at the end of the password or at
//! the start of a structured match. Gaps are never split into smaller random
//! segments, so each uncovered run is charged once by the random cost model.

use crate::analysis::{AnalysisResult, PatternError};
use crate::pattern::{MatchCollection, PatternMatch};
use crate::random::{self, ClassSet};

#[derive(Debug, Clone, Copy)]
enum Transition {
    /// Candidate match (index into the flattened collection), then the best
    /// continuation after it.
    Match(usize),
    /// Random run up to `end`, then the structured continuation there (or
    /// nothing, when `end` is the end of the password).
    Gap(usize),
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    cost: f64,
    segments: usize,
    transition: Transition,
}

/// Keeps the candidate with the smaller cost; equal costs prefer fewer
/// segments, and remaining ties keep the earliest-considered candidate, so
/// the result is deterministic for a given collection.
fn consider(best: &mut Option<Cell>, candidate: Cell) {
    let replace = match best {
        None => true,
        Some(current) => {
            candidate.cost < current.cost
                || (candidate.cost == current.cost && candidate.segments < current.segments)
        }
    };
    if replace {
        *best = Some(candidate);
    }
}

/// Finds the non-overlapping decomposition of the password with the smallest
/// total guess space, falling back to the random cost model for uncovered
/// runs. Always succeeds in producing a finite answer, even with an empty
/// collection.
pub fn optimize(collection: &MatchCollection<'_>) -> Result<AnalysisResult, PatternError> {
    let password = collection.password();
    let chars: Vec<char> = password.chars().collect();
    let n = chars.len();
    let mut result = AnalysisResult::new(password);
    if n == 0 {
        return Ok(result);
    }

    let matches: Vec<&PatternMatch> = collection.iter().collect();
    let mut by_start: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (index, m) in matches.iter().enumerate() {
        // out-of-range candidates cannot take part in a valid path
        if m.start() < n && m.end() <= n {
            by_start[m.start()].push(index);
        }
    }

    // best[i]: cheapest suffix decomposition from i
    // structured[i]: cheapest suffix decomposition that begins with a match
    let mut best: Vec<Option<Cell>> = vec![None; n + 1];
    let mut structured: Vec<Option<Cell>> = vec![None; n + 1];
    best[n] = Some(Cell {
        cost: 1.0,
        segments: 0,
        transition: Transition::Gap(n),
    });

    for i in (0..n).rev() {
        let mut best_here: Option<Cell> = None;
        for &index in &by_start[i] {
            let m = matches[index];
            if let Some(next) = best[m.end()] {
                consider(
                    &mut best_here,
                    Cell {
                        cost: m.weight() * next.cost,
                        segments: next.segments + 1,
                        transition: Transition::Match(index),
                    },
                );
            }
        }
        structured[i] = best_here;

        // a single random run from i, ending at the end of the password or
        // where a structured continuation takes over
        let mut classes = ClassSet::default();
        for end in i + 1..=n {
            classes.observe(chars[end - 1]);
            let continuation = if end == n {
                Some((1.0, 0))
            } else {
                structured[end].map(|cell| (cell.cost, cell.segments))
            };
            let Some((next_cost, next_segments)) = continuation else {
                continue;
            };
            let gap_cost = classes.alphabet_size().powi((end - i) as i32);
            consider(
                &mut best_here,
                Cell {
                    cost: gap_cost * next_cost,
                    segments: next_segments + 1,
                    transition: Transition::Gap(end),
                },
            );
        }
        best[i] = best_here;
    }

    // walk the recorded transitions forward and collect the chosen segments;
    // a leading gap is the implicit random prefix and stays out of the path
    let mut chosen: Vec<PatternMatch> = Vec::new();
    let mut i = 0usize;
    let mut take_structured = false;
    while i < n {
        let cell = if take_structured {
            structured[i]
        } else {
            best[i]
        };
        let Some(cell) = cell else {
            unreachable!("no decomposition recorded for suffix at {i}");
        };
        match cell.transition {
            Transition::Match(index) => {
                chosen.push(matches[index].clone());
                i = matches[index].end();
                take_structured = false;
            }
            Transition::Gap(end) => {
                if !chosen.is_empty() {
                    chosen.push(random::random_match(&chars, i, end - i));
                }
                i = end;
                take_structured = end < n;
            }
        }
    }

    for m in chosen.into_iter().rev() {
        result.add_pattern(Some(m))?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{self, KeySequenceFinder};
    use crate::pattern::{PatternCategory, PatternFinder};
    use std::sync::Arc;

    fn word(password: &str, start: usize, length: usize, weight: f64) -> PatternMatch {
        let text: String = password.chars().skip(start).take(length).collect();
        PatternMatch::new(
            start,
            length,
            text,
            weight,
            PatternCategory::Dictionary,
            "test word",
            "test",
        )
    }

    /// Path matches plus implied gaps must tile the whole password.
    fn assert_covers(result: &AnalysisResult) {
        let n = result.password().chars().count();
        let path = result.path();
        if path.is_empty() {
            return;
        }
        for pair in path.windows(2) {
            assert_eq!(
                pair[0].end(),
                pair[1].start(),
                "path is not contiguous: {path:?}"
            );
        }
        assert_eq!(path[path.len() - 1].end(), n, "path does not reach the end");
    }

    #[test]
    fn test_empty_collection_is_all_random() {
        let password = "x9$Ab";
        let collection = MatchCollection::new(password);
        let result = optimize(&collection).unwrap();
        assert!(result.path().is_empty());
        assert_eq!(result.total_cost(), random::run_cost(password));
        assert_eq!(result.relative_cost(), random::run_cost(password));
    }

    #[test]
    fn test_empty_password() {
        let collection = MatchCollection::new("");
        let result = optimize(&collection).unwrap();
        assert!(result.path().is_empty());
        assert_eq!(result.total_cost(), 1.0);
    }

    #[test]
    fn test_cheap_match_beats_random() {
        let password = "qwerty";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 0, 6, 100.0));
        let result = optimize(&collection).unwrap();
        assert_eq!(result.path().len(), 1);
        assert_eq!(result.total_cost(), 100.0);
        assert_covers(&result);
    }

    #[test]
    fn test_expensive_match_loses_to_random() {
        let password = "abc";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 0, 3, 1e12));
        let result = optimize(&collection).unwrap();
        assert!(result.path().is_empty());
        assert_eq!(result.total_cost(), random::run_cost(password));
    }

    #[test]
    fn test_prefix_before_first_match_stays_implicit() {
        let password = "xxqwerty";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 2, 6, 10.0));
        let result = optimize(&collection).unwrap();
        assert_eq!(result.path().len(), 1);
        assert_eq!(result.path()[0].start(), 2);
        assert_eq!(result.relative_cost(), 10.0);
        assert_eq!(result.total_cost(), random::run_cost("xx") * 10.0);
    }

    #[test]
    fn test_interior_gap_materializes_as_random_match() {
        let password = "abcxxdef";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 0, 3, 5.0));
        collection.add(word(password, 5, 3, 7.0));
        let result = optimize(&collection).unwrap();
        assert_eq!(result.path().len(), 3);
        assert_eq!(result.path()[1].category(), PatternCategory::Random);
        assert_eq!(result.path()[1].start(), 3);
        assert_eq!(result.path()[1].length(), 2);
        let gap_cost = random::run_cost("xx");
        assert_eq!(result.relative_cost(), 5.0 * gap_cost * 7.0);
        assert_eq!(result.total_cost(), 5.0 * gap_cost * 7.0);
        assert_covers(&result);
    }

    #[test]
    fn test_trailing_gap_materializes() {
        let password = "abcdefxx";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 0, 6, 5.0));
        let result = optimize(&collection).unwrap();
        assert_eq!(result.path().len(), 2);
        assert_eq!(result.path()[1].category(), PatternCategory::Random);
        assert_eq!(result.total_cost(), 5.0 * random::run_cost("xx"));
        assert_covers(&result);
    }

    #[test]
    fn test_overlapping_candidates_resolve_to_cheapest() {
        let password = "abcdef";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 0, 4, 1000.0));
        collection.add(word(password, 0, 3, 2.0));
        collection.add(word(password, 3, 3, 2.0));
        collection.add(word(password, 2, 4, 1000.0));
        let result = optimize(&collection).unwrap();
        assert_eq!(result.path().len(), 2);
        assert_eq!(result.total_cost(), 4.0);
        assert_covers(&result);
    }

    #[test]
    fn test_duplicate_candidates_are_harmless() {
        let password = "abcdef";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 0, 6, 10.0));
        collection.add(word(password, 0, 6, 10.0));
        let result = optimize(&collection).unwrap();
        assert_eq!(result.path().len(), 1);
        assert_eq!(result.total_cost(), 10.0);
    }

    #[test]
    fn test_equal_cost_prefers_fewer_segments() {
        let password = "abcdef";
        let mut collection = MatchCollection::new(password);
        collection.add(word(password, 0, 3, 10.0));
        collection.add(word(password, 3, 3, 10.0));
        collection.add(word(password, 0, 6, 100.0));
        let result = optimize(&collection).unwrap();
        assert_eq!(result.total_cost(), 100.0);
        assert_eq!(result.path().len(), 1, "tie must prefer the longer span");
    }

    #[test]
    fn test_path_is_non_overlapping_and_sorted() {
        let password = "qwerty123";
        let layout = Arc::new(keyboard::qwerty_for_tests());
        let finder = KeySequenceFinder::new(layout);
        let result = optimize(&finder.search(password)).unwrap();
        assert_covers(&result);
        for pair in result.path().windows(2) {
            assert!(pair[0].start() < pair[1].start());
            assert!(pair[0].end() <= pair[1].start());
        }
    }

    #[test]
    fn test_keyboard_run_beats_random_baseline() {
        let password = "qwertyuiop";
        let layout = Arc::new(keyboard::qwerty_for_tests());
        let finder = KeySequenceFinder::new(layout);
        let result = optimize(&finder.search(password)).unwrap();
        assert!(!result.path().is_empty());
        assert!(result.total_cost() < random::run_cost(password));
    }

    #[test]
    fn test_determinism_across_runs() {
        let password = "qwerty99x";
        let layout = Arc::new(keyboard::qwerty_for_tests());
        let finder = KeySequenceFinder::new(layout);
        let first = optimize(&finder.search(password)).unwrap();
        let second = optimize(&finder.search(password)).unwrap();
        assert_eq!(first.path(), second.path());
        assert_eq!(first.total_cost(), second.total_cost());
    }

    #[test]
    fn test_stress_many_analyses() {
        use std::time::{Duration, Instant};
        let password = "qwerty1999";
        let layout = Arc::new(keyboard::qwerty_for_tests());
        let finder = KeySequenceFinder::new(layout);
        let start = Instant::now();
        for _ in 0..20_000 {
            let collection = finder.search(password);
            let _ = optimize(&collection).unwrap();
        }
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "optimizer is unexpectedly slow: {:?}",
            start.elapsed()
        );
    }
}
