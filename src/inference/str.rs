use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate};

/// Distinct literals a string slot may carry and still be emitted as a
/// literal union.
const ENUM_MAX: usize = 8;
const ENUM_MAX_LEN: usize = 16;
/// Past this many distinct values the literal set is dropped entirely.
const MAX_LITS: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct StrC {
    /// Distinct values seen; emptied on overflow.
    pub lits: BTreeSet<String>,
    pub overflow: bool,
    /// Total observations, repeats included.
    pub seen: u64,
    pub all_dates: bool,
}

impl StrC {
    pub fn point(s: &str) -> Self {
        Self { lits: BTreeSet::from([s.to_string()]), overflow: false, seen: 1, all_dates: looks_like_date(s) }
    }

    pub(super) fn join(a: &Self, b: &Self) -> Self {
        let mut lits = &a.lits | &b.lits;
        let overflow = a.overflow || b.overflow || lits.len() > MAX_LITS;
        if overflow {
            lits.clear();
        }
        Self { lits, overflow, seen: a.seen + b.seen, all_dates: a.all_dates && b.all_dates }
    }

    /// A closed literal set: few short values that actually repeat.
    pub fn literal_union(&self) -> Option<Vec<&str>> {
        let small = !self.overflow && self.lits.len() <= ENUM_MAX;
        let repeated = self.seen > self.lits.len() as u64;
        if small && repeated && self.lits.iter().all(|s| looks_humanish(s)) {
            return Some(self.lits.iter().map(String::as_str).collect());
        }
        None
    }
}

pub fn looks_humanish(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= ENUM_MAX_LEN
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
}

pub fn looks_like_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
