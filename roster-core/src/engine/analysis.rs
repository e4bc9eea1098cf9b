//! Problem analysis and difficulty classification.
//!
//! Aggregates availability against required coverage and counts heavily
//! constrained people, then assigns the difficulty class that drives the
//! penalty schedule. The thresholds are deliberately conservative: harder
//! classes do not change what is feasible, only how aggressively structural
//! penalties outrank balance penalties.

use super::preprocess::EffectivePerson;
use crate::calendar::Calendar;
use crate::models::{Difficulty, Policy};

/// Density above which a person counts as heavily constrained.
const HEAVY_DENSITY: f64 = 0.4;

/// Aggregate measures of one scheduling problem.
#[derive(Debug, Clone)]
pub struct ProblemAnalysis {
    pub total_days: u32,
    /// `total_days * min_required_per_day`
    pub required_total: u32,
    /// Sum of available person-days over all people
    pub total_available: u32,
    /// `total_available / max(1, required_total)`
    pub availability_ratio: f64,
    /// People with unavailability density above 0.4
    pub heavy_count: u32,
    pub difficulty: Difficulty,
}

/// Computes the aggregate measures and classifies difficulty.
pub fn analyze(calendar: &Calendar, people: &[EffectivePerson], policy: &Policy) -> ProblemAnalysis {
    let total_days = calendar.len() as u32;
    let required_total = total_days * policy.min_required_per_day;
    let total_available: u32 = people
        .iter()
        .map(|p| total_days - p.unavailable_count)
        .sum();
    let availability_ratio = total_available as f64 / required_total.max(1) as f64;
    let heavy_count = people
        .iter()
        .filter(|p| p.density(total_days) > HEAVY_DENSITY)
        .count() as u32;

    let difficulty = classify(heavy_count, availability_ratio);

    ProblemAnalysis {
        total_days,
        required_total,
        total_available,
        availability_ratio,
        heavy_count,
        difficulty,
    }
}

fn classify(heavy_count: u32, availability_ratio: f64) -> Difficulty {
    if heavy_count >= 3 || availability_ratio < 1.1 {
        Difficulty::Apocalyptic
    } else if heavy_count >= 2 || availability_ratio < 1.3 {
        Difficulty::Extreme
    } else if heavy_count >= 1 || availability_ratio < 1.5 {
        Difficulty::Hard
    } else {
        Difficulty::Medium
    }
}
