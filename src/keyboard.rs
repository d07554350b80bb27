//! Keyboard-adjacency sequence detection.
//!
//! Identifies four kinds of keyboard sequences: horizontal runs, diagonal
//! runs, and repeated keys, with three-and-four character horizontal runs
//! weighted as a separate class from five-or-more, since long one-hand runs
//! are rarer.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::pattern::{MatchCollection, PatternCategory, PatternFinder, PatternMatch};

/// Movement between two keys on the physical layout. `Repeat` is the same
/// key pressed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    Repeat,
}

impl Direction {
    pub const ALL: [Direction; 7] = [
        Direction::Left,
        Direction::Right,
        Direction::UpperLeft,
        Direction::UpperRight,
        Direction::LowerLeft,
        Direction::LowerRight,
        Direction::Repeat,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::UpperLeft => Direction::LowerRight,
            Direction::UpperRight => Direction::LowerLeft,
            Direction::LowerLeft => Direction::UpperRight,
            Direction::LowerRight => Direction::UpperLeft,
            Direction::Repeat => Direction::Repeat,
        }
    }

    fn neighbor_slot(self) -> Option<usize> {
        match self {
            Direction::Left => Some(0),
            Direction::Right => Some(1),
            Direction::UpperLeft => Some(2),
            Direction::UpperRight => Some(3),
            Direction::LowerLeft => Some(4),
            Direction::LowerRight => Some(5),
            Direction::Repeat => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::UpperLeft => "upper-left",
            Direction::UpperRight => "upper-right",
            Direction::LowerLeft => "lower-left",
            Direction::LowerRight => "lower-right",
            Direction::Repeat => "repeat",
        };
        f.write_str(name)
    }
}

/// One physical key: the characters its plain and shifted faces produce and
/// its neighbors in the six adjacency directions.
#[derive(Debug, Clone)]
pub struct Key {
    lower: char,
    upper: char,
    neighbors: [Option<usize>; 6],
}

impl Key {
    pub fn lower(&self) -> char {
        self.lower
    }

    pub fn upper(&self) -> char {
        self.upper
    }

    fn produces(&self, c: char) -> bool {
        self.lower == c || self.upper == c
    }
}

/// Immutable keyboard adjacency table.
///
/// Built once from external layout data and shared read-only (via `Arc`) by
/// any number of finders; it is never mutated after construction, so
/// concurrent searches need no synchronization.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    name: String,
    keys: Vec<Key>,
    by_char: HashMap<char, usize>,
    diagonal_combo_total: u64,
    horizontal_combo_3: u64,
    horizontal_combo_4: u64,
    horizontal_combo_total: u64,
}

impl KeyboardLayout {
    pub fn builder(name: impl Into<String>) -> KeyboardLayoutBuilder {
        KeyboardLayoutBuilder {
            name: name.into(),
            keys: Vec::new(),
            by_char: HashMap::new(),
            diagonal_combo_total: 0,
            horizontal_combo_3: 0,
            horizontal_combo_4: 0,
            horizontal_combo_total: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of character-bearing keys.
    pub fn character_key_count(&self) -> usize {
        self.keys.len()
    }

    /// Total diagonal sequence combinations across the layout.
    pub fn diagonal_combo_total(&self) -> u64 {
        self.diagonal_combo_total
    }

    /// Horizontal sequence combinations of exactly `length` (3 or 4; other
    /// lengths are folded into the total).
    pub fn horizontal_combo_size(&self, length: usize) -> u64 {
        match length {
            3 => self.horizontal_combo_3,
            4 => self.horizontal_combo_4,
            _ => 0,
        }
    }

    /// Total horizontal sequence combinations of any length.
    pub fn horizontal_combo_total(&self) -> u64 {
        self.horizontal_combo_total
    }

    pub fn key_index(&self, c: char) -> Option<usize> {
        self.by_char.get(&c).copied()
    }

    pub fn key(&self, index: usize) -> &Key {
        &self.keys[index]
    }

    /// Whether moving from `key` in `direction` lands on a key producing `c`.
    fn matches_direction(&self, key: usize, direction: Direction, c: char) -> bool {
        match direction.neighbor_slot() {
            None => self.keys[key].produces(c),
            Some(slot) => self.keys[key].neighbors[slot]
                .is_some_and(|neighbor| self.keys[neighbor].produces(c)),
        }
    }

    /// Direction of the sequence started by the pair (`key`, `c`), if any.
    fn sequence_direction(&self, key: usize, c: char) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.matches_direction(key, *direction, c))
    }
}

/// Builder populated from external layout data: keys, adjacency links, and
/// the layout's precomputed combination totals.
#[derive(Debug)]
pub struct KeyboardLayoutBuilder {
    name: String,
    keys: Vec<Key>,
    by_char: HashMap<char, usize>,
    diagonal_combo_total: u64,
    horizontal_combo_3: u64,
    horizontal_combo_4: u64,
    horizontal_combo_total: u64,
}

impl KeyboardLayoutBuilder {
    fn add_key(&mut self, lower: char, upper: char) -> usize {
        let index = self.keys.len();
        self.keys.push(Key {
            lower,
            upper,
            neighbors: [None; 6],
        });
        self.by_char.insert(lower, index);
        self.by_char.insert(upper, index);
        index
    }

    /// Registers a single key by its plain and shifted characters.
    pub fn key(mut self, lower: char, upper: char) -> Self {
        self.add_key(lower, upper);
        self
    }

    /// Registers a row of keys and links left/right neighbors within it.
    pub fn row(mut self, lower: &str, upper: &str) -> Self {
        let indices: Vec<usize> = lower
            .chars()
            .zip(upper.chars())
            .map(|(l, u)| self.add_key(l, u))
            .collect();
        for pair in indices.windows(2) {
            if let Some(slot) = Direction::Right.neighbor_slot() {
                self.keys[pair[0]].neighbors[slot] = Some(pair[1]);
            }
            if let Some(slot) = Direction::Left.neighbor_slot() {
                self.keys[pair[1]].neighbors[slot] = Some(pair[0]);
            }
        }
        self
    }

    /// Links two keys (named by their plain characters) in `direction`,
    /// recording the opposite link as well. Unknown characters are ignored.
    pub fn link(mut self, from: char, direction: Direction, to: char) -> Self {
        let (Some(&from_idx), Some(&to_idx)) = (self.by_char.get(&from), self.by_char.get(&to))
        else {
            debug_assert!(false, "link references an unregistered key");
            return self;
        };
        if let Some(slot) = direction.neighbor_slot() {
            self.keys[from_idx].neighbors[slot] = Some(to_idx);
        }
        if let Some(slot) = direction.opposite().neighbor_slot() {
            self.keys[to_idx].neighbors[slot] = Some(from_idx);
        }
        self
    }

    /// Sets the layout's combination totals: diagonal combos of any length,
    /// horizontal combos of exactly 3 and exactly 4, and horizontal combos of
    /// any length.
    pub fn combos(
        mut self,
        diagonal_total: u64,
        horizontal_3: u64,
        horizontal_4: u64,
        horizontal_total: u64,
    ) -> Self {
        self.diagonal_combo_total = diagonal_total;
        self.horizontal_combo_3 = horizontal_3;
        self.horizontal_combo_4 = horizontal_4;
        self.horizontal_combo_total = horizontal_total;
        self
    }

    pub fn build(self) -> KeyboardLayout {
        KeyboardLayout {
            name: self.name,
            keys: self.keys,
            by_char: self.by_char,
            diagonal_combo_total: self.diagonal_combo_total,
            horizontal_combo_3: self.horizontal_combo_3,
            horizontal_combo_4: self.horizontal_combo_4,
            horizontal_combo_total: self.horizontal_combo_total,
        }
    }
}

/// Detects keyboard-adjacency sequences of length 3 or more.
///
/// Every contiguous sub-window of a live run is reported, not only the
/// maximal run, because a shorter window can be the cheaper building block
/// for the optimizer.
pub struct KeySequenceFinder {
    layout: Arc<KeyboardLayout>,
    horizontal_3n4: u64,
    horizontal_5plus: u64,
}

impl KeySequenceFinder {
    pub fn new(layout: Arc<KeyboardLayout>) -> Self {
        let horizontal_3n4 = layout.horizontal_combo_size(3) + layout.horizontal_combo_size(4);
        let horizontal_5plus = layout
            .horizontal_combo_total()
            .saturating_sub(horizontal_3n4);
        Self {
            layout,
            horizontal_3n4,
            horizontal_5plus,
        }
    }

    fn report(
        &self,
        patterns: &mut MatchCollection<'_>,
        chars: &[char],
        start: usize,
        length: usize,
        direction: Direction,
        shifted: &[bool],
    ) {
        let (mut weight, category, mut description) = match direction {
            Direction::Left | Direction::Right => {
                let combos = if length > 4 {
                    self.horizontal_5plus
                } else {
                    self.horizontal_3n4
                };
                (
                    combos as f64,
                    PatternCategory::Horizontal,
                    "Keyboard horizontal sequence".to_string(),
                )
            }
            Direction::UpperLeft
            | Direction::UpperRight
            | Direction::LowerLeft
            | Direction::LowerRight => (
                self.layout.diagonal_combo_total() as f64,
                PatternCategory::Diagonal,
                format!("Keyboard diagonal sequence ({direction})"),
            ),
            Direction::Repeat => {
                // key count times the possible repeat lengths; repeats of one
                // or two characters are not counted as useful patterns
                let repeats = chars.len().saturating_sub(2);
                (
                    self.layout.character_key_count() as f64 * repeats as f64,
                    PatternCategory::Repeated,
                    "Keyboard repeated character".to_string(),
                )
            }
        };

        let window = &shifted[start..start + length];
        let any_shifted = window.iter().any(|&s| s);
        let any_plain = window.iter().any(|&s| !s);
        if any_shifted && any_plain {
            // each position could independently be shifted or not
            weight *= (2 * length) as f64;
            description.push_str(", random SHIFT");
        } else {
            // two possibilities: all shifted, or all plain
            weight *= 2.0;
        }

        let text: String = chars[start..start + length].iter().collect();
        patterns.add(PatternMatch::new(
            start,
            length,
            text,
            weight,
            category,
            description,
            self.layout.name(),
        ));
    }
}

impl PatternFinder for KeySequenceFinder {
    fn search<'p>(&self, password: &'p str) -> MatchCollection<'p> {
        let mut patterns = MatchCollection::new(password);
        let chars: Vec<char> = password.chars().collect();
        if chars.is_empty() {
            return patterns;
        }

        // Shifted is more than upper case: it is any character produced with
        // the shift key held down.
        let mut shifted = vec![false; chars.len()];
        let mut previous = self.layout.key_index(chars[0]);
        if let Some(key) = previous {
            shifted[0] = self.layout.key(key).upper() == chars[0];
        }
        let mut current_direction: Option<Direction> = None;
        let mut start_of_sequence = 0usize;

        for i in 1..chars.len() {
            let c = chars[i];
            let Some(current) = self.layout.key_index(c) else {
                // unmapped characters break any in-progress run
                previous = None;
                current_direction = None;
                continue;
            };
            shifted[i] = self.layout.key(current).upper() == c;
            let Some(prev) = previous else {
                previous = Some(current);
                continue;
            };

            if let Some(direction) = current_direction {
                if self.layout.matches_direction(prev, direction, c) {
                    // the sequence continues; report every window of length
                    // three or more ending at this position
                    if i - start_of_sequence >= 2 {
                        for start in start_of_sequence..=i - 2 {
                            self.report(
                                &mut patterns,
                                &chars,
                                start,
                                i - start + 1,
                                direction,
                                &shifted,
                            );
                        }
                    }
                } else {
                    current_direction = None;
                }
            }

            if current_direction.is_none() {
                // no active direction: does this pair start a new sequence?
                if let Some(direction) = self.layout.sequence_direction(prev, c) {
                    current_direction = Some(direction);
                    start_of_sequence = i - 1;
                }
            }
            previous = Some(current);
        }
        patterns
    }
}

#[cfg(test)]
pub(crate) fn qwerty_for_tests() -> KeyboardLayout {
    let mut builder = KeyboardLayout::builder("qwerty-test")
        .row("qwertyuiop", "QWERTYUIOP")
        .row("asdfghjkl", "ASDFGHJKL")
        .row("zxcvbnm", "ZXCVBNM")
        .combos(104, 52, 50, 200);
    for (top, bottom) in [("qwertyuiop", "asdfghjkl"), ("asdfghjkl", "zxcvbnm")] {
        let top: Vec<char> = top.chars().collect();
        for (i, b) in bottom.chars().enumerate() {
            builder = builder.link(top[i], Direction::LowerLeft, b);
        }
    }
    builder.build()
}
