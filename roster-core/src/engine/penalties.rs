//! Difficulty-adaptive penalty schedule.
//!
//! One mapping from difficulty class to the concrete penalty magnitudes the
//! objective uses. The model reads this struct and nothing else; no penalty
//! constant appears anywhere outside this file. Within each class the
//! ordering is `one_day_block > no_work > critical_long_block > shortage >
//! long_block`, and every penalty grows strictly with difficulty.

use crate::models::Difficulty;

/// Penalty magnitudes for one difficulty class. Units are abstract cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltySchedule {
    /// Base block shorter than the minimum (soft mode only)
    pub one_day_block: f64,
    /// One missing person on one day, below required coverage
    pub shortage: f64,
    /// A person with zero Base days over the whole window
    pub no_work: f64,
    /// One day by which a Base run exceeds the soft length threshold
    pub long_block: f64,
    /// A Base run sitting exactly at the hard consecutive cap
    pub critical_long_block: f64,
    /// One weekday Base day for a weekend-only person
    pub weekend_only_weekday: f64,
}

impl PenaltySchedule {
    /// The schedule for a difficulty class.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Medium => PenaltySchedule {
                one_day_block: 10_000_000.0,
                shortage: 1_000_000.0,
                no_work: 5_000_000.0,
                long_block: 50_000.0,
                critical_long_block: 2_000_000.0,
                weekend_only_weekday: 50_000.0,
            },
            Difficulty::Hard => PenaltySchedule {
                one_day_block: 20_000_000.0,
                shortage: 2_000_000.0,
                no_work: 10_000_000.0,
                long_block: 100_000.0,
                critical_long_block: 5_000_000.0,
                weekend_only_weekday: 100_000.0,
            },
            Difficulty::Extreme => PenaltySchedule {
                one_day_block: 30_000_000.0,
                shortage: 3_000_000.0,
                no_work: 15_000_000.0,
                long_block: 150_000.0,
                critical_long_block: 7_000_000.0,
                weekend_only_weekday: 150_000.0,
            },
            Difficulty::Apocalyptic => PenaltySchedule {
                one_day_block: 50_000_000.0,
                shortage: 5_000_000.0,
                no_work: 20_000_000.0,
                long_block: 200_000.0,
                critical_long_block: 10_000_000.0,
                weekend_only_weekday: 200_000.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    const CLASSES: [Difficulty; 4] = [
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
        Difficulty::Apocalyptic,
    ];

    #[test]
    fn penalties_escalate_with_difficulty() {
        for pair in CLASSES.windows(2) {
            let easier = PenaltySchedule::for_difficulty(pair[0]);
            let harder = PenaltySchedule::for_difficulty(pair[1]);
            assert!(harder.one_day_block > easier.one_day_block);
            assert!(harder.shortage > easier.shortage);
            assert!(harder.no_work > easier.no_work);
            assert!(harder.long_block > easier.long_block);
            assert!(harder.critical_long_block > easier.critical_long_block);
        }
    }

    #[test]
    fn ordering_holds_within_each_class() {
        for class in CLASSES {
            let p = PenaltySchedule::for_difficulty(class);
            assert!(p.one_day_block > p.no_work);
            assert!(p.no_work > p.critical_long_block);
            assert!(p.critical_long_block > p.shortage);
            assert!(p.shortage > p.long_block);
        }
    }
}
