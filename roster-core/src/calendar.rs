//! Window day sequence and weekend classification.
//!
//! The calendar turns a validated window into an indexed, ordered sequence of
//! days and answers weekend membership for each of them. Day indices are the
//! coordinate system the whole engine works in; dates only reappear at the
//! projection boundary.

use crate::models::{WeekendDay, Window};
use chrono::NaiveDate;

/// The materialized day sequence for one solve.
///
/// Days are contiguous, ordered, and strictly increasing; index 0 is the
/// window start. Weekend membership is precomputed per day from the
/// configured weekend set.
#[derive(Debug, Clone)]
pub struct Calendar {
    days: Vec<NaiveDate>,
    weekend: Vec<bool>,
}

impl Calendar {
    /// Builds the calendar for `window`, classifying each day against
    /// `weekend_days`. The window must already be validated (`start <= end`).
    pub fn new(window: &Window, weekend_days: &[WeekendDay]) -> Self {
        let len = window.length() as usize;
        let days: Vec<NaiveDate> = window.start.iter_days().take(len).collect();
        let weekend = days
            .iter()
            .map(|&d| weekend_days.iter().any(|w| w.matches(d)))
            .collect();
        Calendar { days, weekend }
    }

    /// Number of days in the window.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when the window is empty (never the case after validation).
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The date at `index`.
    pub fn date(&self, index: usize) -> NaiveDate {
        self.days[index]
    }

    /// Whether the day at `index` is in the weekend set.
    pub fn is_weekend(&self, index: usize) -> bool {
        self.weekend[index]
    }

    /// Day index of `date`, if it falls inside the window.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if self.days.is_empty() || date < self.days[0] || date > *self.days.last().unwrap() {
            return None;
        }
        Some((date - self.days[0]).num_days() as usize)
    }

    /// Iterator over all dates in order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }
}
