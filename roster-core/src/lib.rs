//! # Roster-Core: Base/Home Duty Rotation Engine
//!
//! This crate computes a daily Base/Home assignment for each member of a
//! roster over a bounded date window, subject to per-person unavailability
//! and global policy parameters. It targets workforces with rotating on-site
//! duty where the same people repeatedly toggle between two states and
//! fairness, consecutive-run limits, and minimum daily coverage all matter.
//!
//! The engine is pure over its inputs: a single [`solve`] call validates the
//! request, analyzes problem difficulty, adapts penalty weights, runs a
//! seeded, deadline-bounded search, and projects the winning assignment into
//! per-person and per-day views. No state survives the call.
//!
//! ## Quick Example
//!
//! ```no_run
//! use roster_core::{solve, models::*};
//! use chrono::NaiveDate;
//!
//! let request = SolveRequest {
//!     window: Window {
//!         start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         end: NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
//!     },
//!     people: vec![
//!         Person::new("p1", "Dana"),
//!         Person::new("p2", "Omer"),
//!         Person::new("p3", "Noa"),
//!     ],
//!     policy: Policy {
//!         min_required_per_day: 1,
//!         min_base_block: 2,
//!         ..Policy::default()
//!     },
//!     random_seed: Some(42),
//! };
//!
//! match solve(&request) {
//!     Ok(outcome) => {
//!         println!("status: {:?}", outcome.status);
//!         if let Some(schedule) = &outcome.schedule {
//!             for (id, person) in &schedule.people {
//!                 println!("{id}: {} Base days", person.total_base);
//!             }
//!         }
//!     }
//!     Err(e) => eprintln!("rejected: {e}"),
//! }
//! ```

pub mod calendar;
pub mod engine;
pub mod models;

use crate::models::{ProgressCallback, RosterSchedule, SolveOutcome, SolveRequest};
pub use engine::EngineError;

/// Computes a roster for the given request.
///
/// This is the main entry point of the crate. The request is validated in
/// full before any work happens; structural problems (an inverted window, an
/// inconsistent policy, duplicate identities) are returned as
/// [`EngineError`]s. Everything that happens after validation is reported
/// through the outcome's status instead:
///
/// - `Optimal`: the search converged on a feasible schedule within budget
/// - `Feasible`: a feasible schedule was in hand when the deadline hit
/// - `Infeasible`: no assignment can satisfy the hard constraints
/// - `Unknown`: the budget ran out before a feasible schedule was found
/// - `Error`: the backend failed or the result audit found a violation
///
/// `schedule` is present in the outcome exactly for `Optimal` and
/// `Feasible`. Diagnostics (difficulty class, availability ratio, heavy
/// constraint count, wall time, objective) are present for every status.
///
/// # Errors
///
/// Returns an error if the window is inverted or empty of people, a policy
/// field is out of range or internally inconsistent, or two persons share an
/// id or a name. The error message names the offending field, the violated
/// rule, and the value seen.
///
/// # Reproducibility
///
/// With `random_seed` set, identical requests yield identical outcomes as
/// long as the time budget does not truncate the search. Without a seed the
/// outcome is feasible but may differ run-to-run.
pub fn solve(request: &SolveRequest) -> Result<SolveOutcome, EngineError> {
    engine::run(request, None)
}

/// Like [`solve`], but reports progress through a callback.
///
/// The callback receives periodic [`models::ProgressUpdate`]s during the
/// search and can request early termination by returning `false`. A
/// cancelled solve reports `Unknown` and never returns a partial schedule.
///
/// # Example
///
/// ```no_run
/// use roster_core::{solve_with_progress, models::*};
/// use chrono::NaiveDate;
///
/// # let request = SolveRequest {
/// #     window: Window {
/// #         start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
/// #         end: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
/// #     },
/// #     people: vec![Person::new("p1", "Dana")],
/// #     policy: Policy::default(),
/// #     random_seed: None,
/// # };
/// let callback: ProgressCallback = Box::new(|update: &ProgressUpdate| {
///     println!(
///         "iteration {}/{}: best cost {:.1}",
///         update.iteration, update.planned_iterations, update.best_cost
///     );
///     true // keep going
/// });
///
/// let outcome = solve_with_progress(&request, Some(&callback)).unwrap();
/// println!("finished with {:?}", outcome.status);
/// ```
pub fn solve_with_progress(
    request: &SolveRequest,
    progress: Option<&ProgressCallback>,
) -> Result<SolveOutcome, EngineError> {
    engine::run(request, progress)
}

/// Transforms a solved schedule into the per-date calendar shape consumed by
/// downstream UIs: each date maps to `{on_base, at_home}` person lists, in
/// the order people appeared in the request.
pub fn calendar_export(
    request: &SolveRequest,
    schedule: &RosterSchedule,
) -> std::collections::BTreeMap<chrono::NaiveDate, models::CalendarDay> {
    engine::project::calendar_export(request, schedule)
}

/// Flattens a solved schedule into one record per (date, person) pair.
pub fn flat_export(
    request: &SolveRequest,
    schedule: &RosterSchedule,
) -> Vec<models::FlatAssignment> {
    engine::project::flat_export(request, schedule)
}
