//! Russian natural-language date markers, e.g. "15 янв 2024"

use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[\s.,/-]+(\p{Cyrillic}{3,})\.?[\s.,/-]+(\d{4})")
        .expect("date pattern is valid")
});

/// Russian month abbreviations (first three letters) to month numbers
const MONTHS: &[(&str, u32)] = &[
    ("янв", 1),
    ("фев", 2),
    ("мар", 3),
    ("апр", 4),
    ("май", 5),
    ("мая", 5),
    ("июн", 6),
    ("июл", 7),
    ("авг", 8),
    ("сен", 9),
    ("окт", 10),
    ("ноя", 11),
    ("дек", 12),
];

fn month_number(word: &str) -> Option<u32> {
    let prefix: String = word.chars().take(3).flat_map(char::to_lowercase).collect();
    let prefix = prefix.replace('ё', "е");
    MONTHS
        .iter()
        .find(|(abbr, _)| *abbr == prefix)
        .map(|(_, num)| *num)
}

/// Validate one regex candidate against its surroundings and the calendar
fn candidate_date(text: &str, caps: &Captures) -> Option<NaiveDate> {
    let whole = caps.get(0)?;

    // Reject "115 янв" and "2024 5" style runs of digits around the match
    let glued_before = text[..whole.start()]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit());
    let glued_after = text[whole.end()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());
    if glued_before || glued_after {
        return None;
    }

    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every valid date marker in `text`, in order of appearance
pub fn find_dates(text: &str) -> impl Iterator<Item = NaiveDate> + '_ {
    DATE_PATTERN
        .captures_iter(text)
        .filter_map(move |caps| candidate_date(text, &caps))
}

/// First valid date marker in `text`
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    find_dates(text).next()
}

/// Most recent date marker seen while scanning a document top to bottom
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateContext {
    current: Option<NaiveDate>,
}

impl DateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next text fragment; the last valid marker in it becomes current
    pub fn observe(&mut self, text: &str) {
        if let Some(date) = find_dates(text).last() {
            self.current = Some(date);
        }
    }

    pub fn current(&self) -> Option<NaiveDate> {
        self.current
    }
}
