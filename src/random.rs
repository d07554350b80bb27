//! Random-run cost model: the size of the guess space when a character run is
//! treated as uniformly random, derived from the character classes observed.

use crate::pattern::{MatchCollection, PatternCategory, PatternFinder, PatternMatch};

/// Character classes contributing to a random run's alphabet.
///
/// A character belongs to exactly one class, checked in priority order:
/// letters first (split by script), then digits, then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomClass {
    Latin,
    Cyrillic,
    Digits,
    Special,
}

pub const RANDOM_CLASSES: [RandomClass; 4] = [
    RandomClass::Latin,
    RandomClass::Cyrillic,
    RandomClass::Digits,
    RandomClass::Special,
];

impl RandomClass {
    /// Class of a single character.
    pub fn of(ch: char) -> RandomClass {
        if ch.is_alphabetic() {
            if ('\u{0400}'..='\u{04FF}').contains(&ch) {
                RandomClass::Cyrillic
            } else {
                RandomClass::Latin
            }
        } else if ch.is_numeric() {
            RandomClass::Digits
        } else {
            RandomClass::Special
        }
    }

    /// Base alphabet size. Letter classes double when the run mixes both
    /// cases; digits and specials never do.
    pub fn size(self, mixed_case: bool) -> u32 {
        match self {
            RandomClass::Latin => {
                if mixed_case {
                    52
                } else {
                    26
                }
            }
            RandomClass::Cyrillic => {
                if mixed_case {
                    60
                } else {
                    30
                }
            }
            RandomClass::Digits => 10,
            RandomClass::Special => 42,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RandomClass::Latin => "Latin",
            RandomClass::Cyrillic => "Cyrillic",
            RandomClass::Digits => "Digits",
            RandomClass::Special => "Special",
        }
    }
}

/// Incremental record of the classes and cases seen in a growing run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassSet {
    present: [bool; 4],
    has_lower: bool,
    has_upper: bool,
}

impl ClassSet {
    pub fn observe(&mut self, ch: char) {
        self.present[RandomClass::of(ch) as usize] = true;
        self.has_lower |= ch.is_lowercase();
        self.has_upper |= ch.is_uppercase();
    }

    /// Sum of present class sizes. A run with no classified characters
    /// reports 1 so downstream products do not collapse to zero.
    pub fn alphabet_size(&self) -> f64 {
        let mixed = self.has_lower && self.has_upper;
        let total: u32 = RANDOM_CLASSES
            .iter()
            .filter(|class| self.present[**class as usize])
            .map(|class| class.size(mixed))
            .sum();
        if total == 0 { 1.0 } else { f64::from(total) }
    }

    /// Provenance label for the observed classes, e.g. `Latin+Digits`.
    pub fn labels(&self) -> String {
        let labels: Vec<&str> = RANDOM_CLASSES
            .iter()
            .filter(|class| self.present[**class as usize])
            .map(|class| class.label())
            .collect();
        if labels.is_empty() {
            "none".to_string()
        } else {
            labels.join("+")
        }
    }
}

/// Alphabet size implied by the characters of `run`.
pub fn alphabet_size(run: &str) -> f64 {
    let mut set = ClassSet::default();
    for ch in run.chars() {
        set.observe(ch);
    }
    set.alphabet_size()
}

/// Guess-space size of `run` treated as uniformly random characters.
/// The empty run costs 1 (the empty product).
pub fn run_cost(run: &str) -> f64 {
    alphabet_size(run).powi(run.chars().count() as i32)
}

/// Baseline cost for `length` lower-case Latin characters, regardless of what
/// the run actually contains.
pub fn lower_case_cost(length: usize) -> f64 {
    26f64.powi(length as i32)
}

/// Baseline cost for `length` mixed-case Latin characters.
pub fn mixed_case_cost(length: usize) -> f64 {
    52f64.powi(length as i32)
}

/// Builds the RANDOM fallback match for `chars[start..start + length]`.
pub fn random_match(chars: &[char], start: usize, length: usize) -> PatternMatch {
    let mut set = ClassSet::default();
    for &ch in &chars[start..start + length] {
        set.observe(ch);
    }
    let text: String = chars[start..start + length].iter().collect();
    let weight = set.alphabet_size().powi(length as i32);
    let labels = set.labels();
    PatternMatch::new(
        start,
        length,
        text,
        weight,
        PatternCategory::Random,
        format!("Random characters ({labels})"),
        labels,
    )
}

/// Always-available fallback finder: reports the whole password as a single
/// random run.
#[derive(Debug, Default)]
pub struct RandomFinder;

impl PatternFinder for RandomFinder {
    fn search<'p>(&self, password: &'p str) -> MatchCollection<'p> {
        let mut patterns = MatchCollection::new(password);
        let chars: Vec<char> = password.chars().collect();
        if !chars.is_empty() {
            patterns.add(random_match(&chars, 0, chars.len()));
        }
        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_lower_latin() {
        assert_eq!(alphabet_size("abc"), 26.0);
    }

    #[test]
    fn test_alphabet_mixed_latin_doubles() {
        assert_eq!(alphabet_size("aBc"), 52.0);
    }

    #[test]
    fn test_alphabet_cyrillic() {
        assert_eq!(alphabet_size("дом"), 30.0);
        assert_eq!(alphabet_size("Дом"), 60.0);
    }

    #[test]
    fn test_alphabet_classes_are_additive() {
        // lower latin + digits + specials
        assert_eq!(alphabet_size("a1!"), 26.0 + 10.0 + 42.0);
    }

    #[test]
    fn test_alphabet_empty_clamps_to_one() {
        assert_eq!(alphabet_size(""), 1.0);
    }

    #[test]
    fn test_cost_of_empty_run_is_one() {
        assert_eq!(run_cost(""), 1.0);
        assert_eq!(lower_case_cost(0), 1.0);
        assert_eq!(mixed_case_cost(0), 1.0);
    }

    #[test]
    fn test_cost_increases_with_length() {
        let mut previous = run_cost("a");
        for run in ["ab", "abc", "abcd", "abcde"] {
            let cost = run_cost(run);
            assert!(cost > previous, "cost of {run:?} did not increase");
            previous = cost;
        }
    }

    #[test]
    fn test_cost_increases_with_alphabet() {
        // same length, growing alphabet
        assert!(run_cost("abcd") < run_cost("aBcd"));
        assert!(run_cost("aBcd") < run_cost("aBc1"));
        assert!(run_cost("aBc1") < run_cost("aB1!"));
    }

    #[test]
    fn test_baseline_costs() {
        assert_eq!(lower_case_cost(3), 26.0 * 26.0 * 26.0);
        assert_eq!(mixed_case_cost(2), 52.0 * 52.0);
    }

    #[test]
    fn test_random_match_fields() {
        let chars: Vec<char> = "ab12".chars().collect();
        let m = random_match(&chars, 1, 3);
        assert_eq!(m.start(), 1);
        assert_eq!(m.length(), 3);
        assert_eq!(m.text(), "b12");
        assert_eq!(m.category(), PatternCategory::Random);
        assert_eq!(m.weight(), 36f64.powi(3));
        assert_eq!(m.source(), "Latin+Digits");
    }

    #[test]
    fn test_finder_reports_whole_password() {
        let finder = RandomFinder;
        let patterns = finder.search("abc123");
        assert_eq!(patterns.len(), 1);
        let m = patterns.iter().next().unwrap();
        assert_eq!(m.start(), 0);
        assert_eq!(m.length(), 6);
        assert_eq!(m.weight(), run_cost("abc123"));
    }

    #[test]
    fn test_finder_empty_password() {
        let finder = RandomFinder;
        assert!(finder.search("").is_empty());
    }

    #[test]
    fn test_finder_is_deterministic() {
        let finder = RandomFinder;
        let first: Vec<_> = finder.search("aB3!").iter().cloned().collect();
        let second: Vec<_> = finder.search("aB3!").iter().cloned().collect();
        assert_eq!(first, second);
    }
}
