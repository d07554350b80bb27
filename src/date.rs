//! Date pattern detection: day-month-year and year-month-day forms, with or
//! without separators.

use crate::pattern::{MatchCollection, PatternCategory, PatternFinder, PatternMatch};

/// Any day in a two-century window.
const DATE_SPACE_FULL_YEAR: f64 = 366.0 * 200.0;
/// Any day in one century, for two-digit years.
const DATE_SPACE_SHORT_YEAR: f64 = 366.0 * 100.0;

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '/' | '.')
}

fn valid_month(field: &str) -> bool {
    field.parse::<u32>().is_ok_and(|m| (1..=12).contains(&m))
}

fn valid_day(field: &str) -> bool {
    field.parse::<u32>().is_ok_and(|d| (1..=31).contains(&d))
}

fn valid_year(field: &str) -> bool {
    match field.len() {
        2 => field.chars().all(|c| c.is_ascii_digit()),
        4 => field.parse::<u32>().is_ok_and(|y| (1000..=2999).contains(&y)),
        _ => false,
    }
}

/// Tries to read a whole run as one date; returns the weight of the date
/// space it belongs to.
fn parse_run(run: &str) -> Option<f64> {
    let fields: Vec<&str> = run.split(is_separator).collect();
    match fields.as_slice() {
        &[digits] => parse_compact(digits),
        &[first, month, day] if first.len() == 4 => {
            (valid_year(first) && valid_month(month) && valid_day(day))
                .then_some(DATE_SPACE_FULL_YEAR)
        }
        &[month, day, year] => {
            if !valid_month(month) || !valid_day(day) || !valid_year(year) {
                return None;
            }
            if year.len() == 4 {
                Some(DATE_SPACE_FULL_YEAR)
            } else {
                Some(DATE_SPACE_SHORT_YEAR)
            }
        }
        _ => None,
    }
}

/// Unseparated digit runs: MMDDYY, MMDDYYYY, or YYYYMMDD.
fn parse_compact(digits: &str) -> Option<f64> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match digits.len() {
        6 => (valid_month(&digits[0..2]) && valid_day(&digits[2..4]))
            .then_some(DATE_SPACE_SHORT_YEAR),
        8 => {
            if valid_month(&digits[0..2]) && valid_day(&digits[2..4]) && valid_year(&digits[4..8]) {
                Some(DATE_SPACE_FULL_YEAR)
            } else if valid_year(&digits[0..4])
                && valid_month(&digits[4..6])
                && valid_day(&digits[6..8])
            {
                Some(DATE_SPACE_FULL_YEAR)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Finds calendar dates written as a whole digit-and-separator run.
#[derive(Debug, Default)]
pub struct DateFinder;

impl PatternFinder for DateFinder {
    fn search<'p>(&self, password: &'p str) -> MatchCollection<'p> {
        let mut patterns = MatchCollection::new(password);
        let chars: Vec<char> = password.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if !chars[i].is_ascii_digit() {
                i += 1;
                continue;
            }
            // maximal run of digits and separators, trimmed to end on a digit
            let mut end = i;
            let mut last_digit = i;
            while end < chars.len() && (chars[end].is_ascii_digit() || is_separator(chars[end])) {
                if chars[end].is_ascii_digit() {
                    last_digit = end;
                }
                end += 1;
            }
            let run: String = chars[i..=last_digit].iter().collect();
            if let Some(weight) = parse_run(&run) {
                patterns.add(PatternMatch::new(
                    i,
                    last_digit - i + 1,
                    run,
                    weight,
                    PatternCategory::Date,
                    "Calendar date",
                    "date",
                ));
            }
            i = end;
        }
        patterns
    }
}
