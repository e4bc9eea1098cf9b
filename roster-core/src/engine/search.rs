//! The search driver: seeded annealing over the assignment grid.
//!
//! Runs a neighborhood search from the greedy construction, bounded by the
//! policy's wall-clock budget. Cooling and convergence are iteration-based,
//! never wall-clock-based, so a fixed seed reproduces the schedule exactly
//! whenever the deadline does not cut the plan short.

use super::construction;
use super::model::{Grid, PersonEval, RosterModel, HARD_WEIGHT};
use crate::models::{ProgressCallback, ProgressUpdate, SolveRequest};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Iterations between deadline checks.
const DEADLINE_STRIDE: u64 = 512;
/// Iterations between progress callbacks.
const PROGRESS_STRIDE: u64 = 8192;
/// Initial annealing temperature.
const INITIAL_TEMPERATURE: f64 = 2.0e5;
/// Final annealing temperature.
const FINAL_TEMPERATURE: f64 = 1.0e-3;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The no-improvement window elapsed
    Converged,
    /// The full iteration plan completed
    PlanExhausted,
    /// The wall-clock budget ran out
    Deadline,
    /// The progress callback requested termination
    CallbackStop,
}

/// The best grid the search found, with its cost decomposition.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_grid: Grid,
    pub best_cost: f64,
    pub best_soft_cost: f64,
    pub best_hard_violations: u64,
    pub stop_reason: StopReason,
    pub iterations: u64,
}

/// Runs the search for `model`, honoring the request's seed and budget.
pub fn run(
    model: &RosterModel,
    request: &SolveRequest,
    progress: Option<&ProgressCallback>,
) -> SearchResult {
    let started = Instant::now();
    let deadline = started + Duration::from_secs(request.policy.time_budget_seconds);
    let seed = request.random_seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    debug!("search seed: {}", seed);

    let cells = (model.num_people() * model.num_days()) as u64;
    let planned_iterations = (cells * 3_000).clamp(100_000, 2_000_000);
    let no_improvement_limit = (planned_iterations / 5).max(20_000);
    let cooling =
        (FINAL_TEMPERATURE / INITIAL_TEMPERATURE).powf(1.0 / planned_iterations as f64);

    let mut state = SearchState::new(model, construction::build_initial(model));
    let mut current_cost = state.total_cost();
    let mut best_grid = state.grid.clone();
    let mut best_cost = current_cost;
    let mut no_improvement: u64 = 0;
    let mut temperature = INITIAL_TEMPERATURE;
    let mut iteration: u64 = 0;
    let mut stop_reason = StopReason::PlanExhausted;

    while iteration < planned_iterations {
        if iteration % DEADLINE_STRIDE == 0 && Instant::now() >= deadline {
            stop_reason = StopReason::Deadline;
            break;
        }
        if let Some(callback) = progress {
            if iteration % PROGRESS_STRIDE == 0
                && !callback(&update(
                    &state,
                    iteration,
                    planned_iterations,
                    temperature,
                    current_cost,
                    best_cost,
                    no_improvement,
                    started,
                ))
            {
                stop_reason = StopReason::CallbackStop;
                break;
            }
        }

        if let Some(toggles) = propose(model, &state, &mut rng) {
            state.apply(&toggles);
            let candidate_cost = state.total_cost();
            let delta = candidate_cost - current_cost;
            let accept = delta <= 0.0
                || rng.random::<f64>() < (-delta / temperature.max(FINAL_TEMPERATURE)).exp();
            if accept {
                current_cost = candidate_cost;
                if current_cost < best_cost - 1e-9 {
                    best_cost = current_cost;
                    best_grid = state.grid.clone();
                    no_improvement = 0;
                } else {
                    no_improvement += 1;
                }
            } else {
                state.apply(&toggles); // toggles are involutions: re-applying reverts
                no_improvement += 1;
            }
        } else {
            no_improvement += 1;
        }

        if no_improvement >= no_improvement_limit {
            stop_reason = StopReason::Converged;
            break;
        }

        temperature *= cooling;
        iteration += 1;
    }

    let (best_hard, best_soft) = model.evaluate(&best_grid);

    if let Some(callback) = progress {
        callback(&update(
            &state,
            iteration,
            planned_iterations,
            temperature,
            current_cost,
            best_cost,
            no_improvement,
            started,
        ));
    }

    SearchResult {
        best_grid,
        best_cost,
        best_soft_cost: best_soft,
        best_hard_violations: best_hard,
        stop_reason,
        iterations: iteration,
    }
}

#[allow(clippy::too_many_arguments)]
fn update(
    state: &SearchState,
    iteration: u64,
    planned_iterations: u64,
    temperature: f64,
    current_cost: f64,
    best_cost: f64,
    no_improvement: u64,
    started: Instant,
) -> ProgressUpdate {
    ProgressUpdate {
        iteration,
        planned_iterations,
        temperature,
        current_cost,
        best_cost,
        hard_violations: state.hard_violations(),
        best_hard_violations: (best_cost / HARD_WEIGHT).floor() as u64,
        no_improvement_count: no_improvement,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    }
}

/// Incrementally maintained evaluation of the working grid.
struct SearchState<'a> {
    model: &'a RosterModel,
    grid: Grid,
    person_evals: Vec<PersonEval>,
    base_count: Vec<u32>,
    sum_person_hard: u64,
    sum_person_soft: f64,
    sum_day_hard: u64,
    sum_day_soft: f64,
}

impl<'a> SearchState<'a> {
    fn new(model: &'a RosterModel, grid: Grid) -> Self {
        let person_evals: Vec<PersonEval> = (0..model.num_people())
            .map(|p| model.evaluate_person(p, &grid))
            .collect();
        let base_count: Vec<u32> = (0..model.num_days())
            .map(|d| (0..model.num_people()).filter(|&p| grid.get(p, d)).count() as u32)
            .collect();
        let mut state = SearchState {
            model,
            grid,
            person_evals,
            base_count,
            sum_person_hard: 0,
            sum_person_soft: 0.0,
            sum_day_hard: 0,
            sum_day_soft: 0.0,
        };
        state.sum_person_hard = state.person_evals.iter().map(|e| e.hard).sum();
        state.sum_person_soft = state.person_evals.iter().map(|e| e.soft).sum();
        for &count in &state.base_count {
            let (hard, soft) = model.evaluate_day(count);
            state.sum_day_hard += hard;
            state.sum_day_soft += soft;
        }
        state
    }

    fn hard_violations(&self) -> u64 {
        self.sum_person_hard + self.sum_day_hard
    }

    fn total_cost(&self) -> f64 {
        let weekend_counts: Vec<u32> = self.person_evals.iter().map(|e| e.weekend_base).collect();
        self.sum_person_soft
            + self.sum_day_soft
            + self.model.weekend_fairness_cost(&weekend_counts)
            + self.model.max_run_cost(&self.person_evals)
            + HARD_WEIGHT * self.hard_violations() as f64
    }

    /// Applies a set of cell toggles, updating the cached evaluations.
    /// Applying the same toggles again reverts the move.
    fn apply(&mut self, toggles: &[(usize, usize)]) {
        for &(p, d) in toggles {
            let was_base = self.grid.get(p, d);
            self.grid.toggle(p, d);

            let (old_hard, old_soft) = self.model.evaluate_day(self.base_count[d]);
            self.base_count[d] = if was_base {
                self.base_count[d] - 1
            } else {
                self.base_count[d] + 1
            };
            let (new_hard, new_soft) = self.model.evaluate_day(self.base_count[d]);
            self.sum_day_hard = self.sum_day_hard + new_hard - old_hard;
            self.sum_day_soft += new_soft - old_soft;
        }

        let mut touched: Vec<usize> = toggles.iter().map(|&(p, _)| p).collect();
        touched.sort_unstable();
        touched.dedup();
        for p in touched {
            let old = self.person_evals[p];
            let new = self.model.evaluate_person(p, &self.grid);
            self.sum_person_hard = self.sum_person_hard + new.hard - old.hard;
            self.sum_person_soft += new.soft - old.soft;
            self.person_evals[p] = new;
        }
    }
}

/// Proposes a move as a set of cell toggles, or `None` when the drawn
/// neighborhood has no legal move this iteration.
fn propose(
    model: &RosterModel,
    state: &SearchState,
    rng: &mut StdRng,
) -> Option<Vec<(usize, usize)>> {
    let n = model.num_people();
    let days = model.num_days();
    match rng.random_range(0..100u32) {
        // Flip one cell.
        0..=34 => {
            let p = rng.random_range(0..n);
            let d = rng.random_range(0..days);
            if !state.grid.get(p, d) && model.people[p].unavailable[d] {
                return None; // never propose Base on an unavailable day
            }
            Some(vec![(p, d)])
        }
        // Swap a Base person with a Home person on the same day, keeping
        // the day's headcount unchanged.
        35..=69 => {
            let d = rng.random_range(0..days);
            let on_base: Vec<usize> = (0..n).filter(|&p| state.grid.get(p, d)).collect();
            let at_home: Vec<usize> = (0..n)
                .filter(|&p| !state.grid.get(p, d) && !model.people[p].unavailable[d])
                .collect();
            if on_base.is_empty() || at_home.is_empty() {
                return None;
            }
            let give = on_base[rng.random_range(0..on_base.len())];
            let take = at_home[rng.random_range(0..at_home.len())];
            Some(vec![(give, d), (take, d)])
        }
        // Shift one of a person's Base runs by a day in either direction.
        _ => {
            let p = rng.random_range(0..n);
            let runs = base_runs(&state.grid, p, days);
            if runs.is_empty() {
                return None;
            }
            let (start, len) = runs[rng.random_range(0..runs.len())];
            let end = start + len - 1;
            if rng.random_range(0..2u32) == 0 {
                // shift left
                if start == 0
                    || state.grid.get(p, start - 1)
                    || model.people[p].unavailable[start - 1]
                {
                    return None;
                }
                Some(vec![(p, start - 1), (p, end)])
            } else {
                // shift right
                if end + 1 >= days
                    || state.grid.get(p, end + 1)
                    || model.people[p].unavailable[end + 1]
                {
                    return None;
                }
                Some(vec![(p, end + 1), (p, start)])
            }
        }
    }
}

/// The person's maximal Base runs as `(start, len)` pairs.
fn base_runs(grid: &Grid, p: usize, days: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for d in 0..days {
        if grid.get(p, d) {
            if start.is_none() {
                start = Some(d);
            }
        } else if let Some(s) = start.take() {
            runs.push((s, d - s));
        }
    }
    if let Some(s) = start {
        runs.push((s, days - s));
    }
    runs
}
