//! The assignment model: grid representation, hard-constraint accounting,
//! and the soft objective.
//!
//! The model owns no search state. It answers two questions about any grid:
//! how many hard-constraint units it violates, and what its soft cost is.
//! Hard violations are folded into the search cost with a uniform weight
//! several orders above every penalty in the schedule, so the search always
//! descends to feasibility before it trades balance terms.

use super::penalties::PenaltySchedule;
use super::preprocess::EffectivePerson;
use crate::calendar::Calendar;
use crate::models::Policy;

/// Weight of one hard-violation unit in the search cost. Far above every
/// soft penalty so no trade-off can buy a violation back.
pub const HARD_WEIGHT: f64 = 1e12;

/// Tie-break weight on the longest Base run over all persons.
const EPS_MAX_RUN: f64 = 1e-3;

/// Tie-break weight steering Base days toward earlier dates.
const EPS_LEX: f64 = 1e-9;

/// The Boolean (person, day) assignment grid. `true` means Base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    days: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-Home grid.
    pub fn new(people: usize, days: usize) -> Self {
        Grid {
            days,
            cells: vec![false; people * days],
        }
    }

    pub fn get(&self, person: usize, day: usize) -> bool {
        self.cells[person * self.days + day]
    }

    pub fn set(&mut self, person: usize, day: usize, base: bool) {
        self.cells[person * self.days + day] = base;
    }

    pub fn toggle(&mut self, person: usize, day: usize) {
        let cell = &mut self.cells[person * self.days + day];
        *cell = !*cell;
    }
}

/// Evaluation of a single person's row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PersonEval {
    /// Hard-violation units contributed by this row
    pub hard: u64,
    /// Soft cost contributed by this row (penalties, balance, tie-breaks)
    pub soft: f64,
    pub total_base: u32,
    pub total_home: u32,
    pub weekend_base: u32,
    /// Longest Base run in the row
    pub max_base_run: u32,
}

/// The immutable scheduling model for one solve.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub calendar: Calendar,
    pub people: Vec<EffectivePerson>,
    pub penalties: PenaltySchedule,
    pub min_required: u32,
    pub min_block: u32,
    pub allow_single_day_blocks: bool,
    pub allow_edge_short_blocks: bool,
    /// Coverage is a hard constraint when true; slack-with-penalty otherwise
    pub strict_coverage: bool,
    pub max_total_home: Option<u32>,
    pub max_weekend_base: Option<u32>,
    pub enable_home_balance: bool,
    pub enable_weekend_fairness: bool,
    pub home_balance_weight: f64,
    pub weekend_fairness_weight: f64,
}

impl RosterModel {
    pub fn new(
        calendar: Calendar,
        people: Vec<EffectivePerson>,
        policy: &Policy,
        penalties: PenaltySchedule,
    ) -> Self {
        RosterModel {
            calendar,
            people,
            penalties,
            min_required: policy.min_required_per_day,
            min_block: policy.min_base_block,
            allow_single_day_blocks: policy.allow_single_day_blocks,
            allow_edge_short_blocks: policy.allow_edge_short_blocks,
            strict_coverage: policy.strict_consecutive_limits,
            max_total_home: policy.max_total_home,
            max_weekend_base: policy.max_weekend_base,
            enable_home_balance: policy.enable_home_balance_penalty,
            enable_weekend_fairness: policy.enable_weekend_fairness,
            home_balance_weight: policy.home_balance_weight,
            weekend_fairness_weight: policy.weekend_fairness_weight,
        }
    }

    pub fn num_people(&self) -> usize {
        self.people.len()
    }

    pub fn num_days(&self) -> usize {
        self.calendar.len()
    }

    /// Evaluates one person's row from scratch.
    pub fn evaluate_person(&self, person: usize, grid: &Grid) -> PersonEval {
        let p = &self.people[person];
        let days = self.num_days();
        let mut eval = PersonEval::default();
        let mut lex = 0.0f64;
        let mut base_run = 0u32;
        let mut base_run_start = 0usize;
        let mut home_run = 0u32;

        for d in 0..days {
            if grid.get(person, d) {
                if p.unavailable[d] {
                    eval.hard += 1;
                }
                eval.total_base += 1;
                if self.calendar.is_weekend(d) {
                    eval.weekend_base += 1;
                } else if p.weekend_only {
                    eval.soft += self.penalties.weekend_only_weekday;
                }
                lex += d as f64;
                if base_run == 0 {
                    base_run_start = d;
                }
                base_run += 1;
                if home_run > 0 {
                    self.finish_home_run(p, home_run, &mut eval);
                    home_run = 0;
                }
            } else {
                if base_run > 0 {
                    self.finish_base_run(p, base_run, base_run_start == 0, false, &mut eval);
                    base_run = 0;
                }
                home_run += 1;
            }
        }
        if base_run > 0 {
            self.finish_base_run(p, base_run, base_run_start == 0, true, &mut eval);
        }
        if home_run > 0 {
            self.finish_home_run(p, home_run, &mut eval);
        }

        eval.total_home = days as u32 - eval.total_base;

        if let Some(cap) = self.max_total_home {
            if eval.total_home > cap {
                eval.hard += (eval.total_home - cap) as u64;
            }
        }
        if let Some(cap) = self.max_weekend_base {
            if eval.weekend_base > cap {
                eval.hard += (eval.weekend_base - cap) as u64;
            }
        }
        if eval.total_base == 0 {
            eval.soft += self.penalties.no_work;
        }
        if self.enable_home_balance {
            let deviation = (eval.total_home as f64 - p.home_target as f64).abs();
            eval.soft += self.home_balance_weight * deviation;
        }
        eval.soft += EPS_LEX * lex;

        eval
    }

    fn finish_base_run(
        &self,
        person: &EffectivePerson,
        len: u32,
        at_start_edge: bool,
        at_end_edge: bool,
        eval: &mut PersonEval,
    ) {
        eval.max_base_run = eval.max_base_run.max(len);

        let cap = person.max_base_run;
        if len > cap {
            eval.hard += (len - cap) as u64;
        } else if len == cap {
            eval.soft += self.penalties.critical_long_block;
        } else {
            let soft_threshold = self.min_block.max(cap.saturating_sub(2));
            if len > soft_threshold {
                eval.soft += self.penalties.long_block * (len - soft_threshold) as f64;
            }
        }

        if len < self.min_block {
            let at_edge = at_start_edge || at_end_edge;
            if at_edge && self.allow_edge_short_blocks {
                return;
            }
            if self.allow_single_day_blocks {
                eval.soft += self.penalties.one_day_block;
            } else {
                eval.hard += 1;
            }
        }
    }

    fn finish_home_run(&self, person: &EffectivePerson, len: u32, eval: &mut PersonEval) {
        if len > person.max_home_run {
            eval.hard += (len - person.max_home_run) as u64;
        }
    }

    /// Hard and soft contribution of one day's Base headcount.
    pub fn evaluate_day(&self, base_count: u32) -> (u64, f64) {
        let deficit = self.min_required.saturating_sub(base_count);
        if deficit == 0 {
            (0, 0.0)
        } else if self.strict_coverage {
            (deficit as u64, 0.0)
        } else {
            (0, self.penalties.shortage * deficit as f64)
        }
    }

    /// Weekend-fairness cost over all persons' weekend Base counts:
    /// a variance surrogate around the rounded mean.
    pub fn weekend_fairness_cost(&self, weekend_counts: &[u32]) -> f64 {
        if !self.enable_weekend_fairness || weekend_counts.is_empty() {
            return 0.0;
        }
        let sum: u32 = weekend_counts.iter().sum();
        let mean = (sum as f64 / weekend_counts.len() as f64).round();
        let spread: f64 = weekend_counts
            .iter()
            .map(|&wb| (wb as f64 - mean).abs())
            .sum();
        self.weekend_fairness_weight * spread
    }

    /// Tie-break term on the longest Base run over all persons.
    pub fn max_run_cost(&self, person_evals: &[PersonEval]) -> f64 {
        let longest = person_evals.iter().map(|e| e.max_base_run).max().unwrap_or(0);
        EPS_MAX_RUN * longest as f64
    }

    /// Full evaluation of a grid: total hard-violation units and soft cost.
    pub fn evaluate(&self, grid: &Grid) -> (u64, f64) {
        let evals: Vec<PersonEval> = (0..self.num_people())
            .map(|p| self.evaluate_person(p, grid))
            .collect();
        let mut hard: u64 = evals.iter().map(|e| e.hard).sum();
        let mut soft: f64 = evals.iter().map(|e| e.soft).sum();

        for d in 0..self.num_days() {
            let count = (0..self.num_people()).filter(|&p| grid.get(p, d)).count() as u32;
            let (day_hard, day_soft) = self.evaluate_day(count);
            hard += day_hard;
            soft += day_soft;
        }

        let weekend_counts: Vec<u32> = evals.iter().map(|e| e.weekend_base).collect();
        soft += self.weekend_fairness_cost(&weekend_counts);
        soft += self.max_run_cost(&evals);

        (hard, soft)
    }

    /// Search cost of a grid: soft cost plus the hard-violation weight.
    pub fn cost(&self, grid: &Grid) -> f64 {
        let (hard, soft) = self.evaluate(grid);
        soft + HARD_WEIGHT * hard as f64
    }

    /// Verifies every hard constraint explicitly, returning the first
    /// violation found. Used as the after-the-fact audit on the grid the
    /// search reported feasible.
    pub fn audit(&self, grid: &Grid) -> Result<(), String> {
        for (idx, p) in self.people.iter().enumerate() {
            for d in 0..self.num_days() {
                if grid.get(idx, d) && p.unavailable[d] {
                    return Err(format!(
                        "person `{}` is on Base on {} despite being unavailable",
                        p.id,
                        self.calendar.date(d)
                    ));
                }
            }

            let mut total_home = 0u32;
            let mut weekend_base = 0u32;
            let mut run = 0u32;
            let mut run_is_base = false;
            let mut run_start = 0usize;
            for d in 0..=self.num_days() {
                let base = d < self.num_days() && grid.get(idx, d);
                if d < self.num_days() {
                    if base {
                        if self.calendar.is_weekend(d) {
                            weekend_base += 1;
                        }
                    } else {
                        total_home += 1;
                    }
                }
                if d > 0 && (d == self.num_days() || base != run_is_base) {
                    if run_is_base {
                        if run > p.max_base_run {
                            return Err(format!(
                                "person `{}` has a Base run of {} days, cap is {}",
                                p.id, run, p.max_base_run
                            ));
                        }
                        let at_edge = run_start == 0 || d == self.num_days();
                        let exempt = (at_edge && self.allow_edge_short_blocks)
                            || self.allow_single_day_blocks;
                        if run < self.min_block && !exempt {
                            return Err(format!(
                                "person `{}` has a Base block of {} days, minimum is {}",
                                p.id, run, self.min_block
                            ));
                        }
                    } else if run > p.max_home_run {
                        return Err(format!(
                            "person `{}` has a Home run of {} days, cap is {}",
                            p.id, run, p.max_home_run
                        ));
                    }
                    run = 0;
                }
                if d < self.num_days() {
                    if run == 0 {
                        run_start = d;
                        run_is_base = base;
                    }
                    run += 1;
                }
            }

            if let Some(cap) = self.max_total_home {
                if total_home > cap {
                    return Err(format!(
                        "person `{}` has {} Home days, max_total_home is {}",
                        p.id, total_home, cap
                    ));
                }
            }
            if let Some(cap) = self.max_weekend_base {
                if weekend_base > cap {
                    return Err(format!(
                        "person `{}` has {} weekend Base days, max_weekend_base is {}",
                        p.id, weekend_base, cap
                    ));
                }
            }
        }

        if self.strict_coverage {
            for d in 0..self.num_days() {
                let count = (0..self.num_people()).filter(|&p| grid.get(p, d)).count() as u32;
                if count < self.min_required {
                    return Err(format!(
                        "day {} has {} people on Base, required minimum is {}",
                        self.calendar.date(d),
                        count,
                        self.min_required
                    ));
                }
            }
        }

        Ok(())
    }
}
