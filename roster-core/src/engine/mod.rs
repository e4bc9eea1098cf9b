//! The scheduling engine pipeline.
//!
//! A solve flows through a fixed sequence of pure stages: validation,
//! person preprocessing, problem analysis, penalty adaptation, model
//! construction, the search driver, and finally projection into the API
//! result shape. Only the search driver consumes wall-clock time; everything
//! else is a deterministic function of the request.

pub mod analysis;
pub mod construction;
pub mod model;
pub mod penalties;
pub mod preprocess;
pub mod project;
pub mod search;
pub mod validation;

use crate::calendar::Calendar;
use crate::models::{
    Diagnostics, ProgressCallback, SolveOutcome, SolveRequest, SolveStatus,
};
use log::{debug, info};
use std::time::Instant;
use thiserror::Error;

/// Errors raised before the engine starts searching.
///
/// All validation happens up front; once the search runs, failures are
/// reported through the outcome's status instead (`Infeasible`, `Unknown`,
/// `Error`).
#[derive(Error, Debug)]
pub enum EngineError {
    /// The window is inverted or the people list is empty.
    #[error("invalid window: {0}")]
    InvalidWindow(String),
    /// A policy field is out of range or internally inconsistent.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    /// Two persons share an `id` or a `name`.
    #[error("duplicate identity: {0}")]
    DuplicateIdentity(String),
    /// The search backend failed to initialize or crashed.
    #[error("solver backend error: {0}")]
    Backend(String),
}

/// Runs the full pipeline for one request.
pub fn run(
    request: &SolveRequest,
    progress: Option<&ProgressCallback>,
) -> Result<SolveOutcome, EngineError> {
    let started = Instant::now();

    validation::validate(request)?;

    let calendar = Calendar::new(&request.window, &request.policy.weekend_days);
    let people = preprocess::effective_people(request, &calendar);
    let analysis = analysis::analyze(&calendar, &people, &request.policy);
    info!(
        "analysis: difficulty={} availability_ratio={:.2} heavy={}",
        analysis.difficulty, analysis.availability_ratio, analysis.heavy_count
    );

    let diagnostics = |objective, message| Diagnostics {
        difficulty: analysis.difficulty,
        availability_ratio: analysis.availability_ratio,
        heavy_count: analysis.heavy_count,
        wall_time_seconds: started.elapsed().as_secs_f64(),
        objective,
        message,
    };

    if let Some(reason) = prove_infeasible(&calendar, &people, request) {
        info!("infeasible by counting argument: {}", reason);
        return Ok(SolveOutcome {
            status: SolveStatus::Infeasible,
            diagnostics: diagnostics(None, Some(reason)),
            schedule: None,
        });
    }

    let penalties = penalties::PenaltySchedule::for_difficulty(analysis.difficulty);
    let model = model::RosterModel::new(calendar, people, &request.policy, penalties);
    let search = search::run(&model, request, progress);
    debug!(
        "search finished: reason={:?} best_cost={:.1} hard={}",
        search.stop_reason, search.best_cost, search.best_hard_violations
    );

    // A cancelled solve never returns partial results, even when a feasible
    // schedule was already in hand.
    let cancelled = search.stop_reason == search::StopReason::CallbackStop;
    if search.best_hard_violations > 0 || cancelled {
        return Ok(SolveOutcome {
            status: SolveStatus::Unknown,
            diagnostics: diagnostics(None, None),
            schedule: None,
        });
    }

    // Post-projection audit: a violated hard constraint at this point means
    // the backend mis-reported feasibility.
    if let Err(violation) = model.audit(&search.best_grid) {
        return Ok(SolveOutcome {
            status: SolveStatus::Error,
            diagnostics: diagnostics(None, Some(violation)),
            schedule: None,
        });
    }

    let schedule = project::project(&model, &search.best_grid);
    let status = match search.stop_reason {
        search::StopReason::Converged | search::StopReason::PlanExhausted => SolveStatus::Optimal,
        search::StopReason::Deadline => SolveStatus::Feasible,
        // Handled above.
        search::StopReason::CallbackStop => SolveStatus::Unknown,
    };

    Ok(SolveOutcome {
        status,
        diagnostics: diagnostics(Some(search.best_soft_cost), None),
        schedule: Some(schedule),
    })
}

/// Counting arguments that prove no assignment can satisfy the hard
/// constraints. Returns a human-readable reason on success.
fn prove_infeasible(
    calendar: &Calendar,
    people: &[preprocess::EffectivePerson],
    request: &SolveRequest,
) -> Option<String> {
    let policy = &request.policy;

    // Daily coverage cannot be met when too few people are available.
    if policy.strict_consecutive_limits && policy.min_required_per_day > 0 {
        for d in 0..calendar.len() {
            let available = people.iter().filter(|p| !p.unavailable[d]).count() as u32;
            if available < policy.min_required_per_day {
                return Some(format!(
                    "day {}: only {} of {} people are available but min_required_per_day is {}",
                    calendar.date(d),
                    available,
                    people.len(),
                    policy.min_required_per_day
                ));
            }
        }
    }

    for p in people {
        // Forced Home days alone may exceed the total-Home cap.
        if let Some(cap) = policy.max_total_home {
            if p.unavailable_count > cap {
                return Some(format!(
                    "person `{}`: {} unavailable days exceed max_total_home {}",
                    p.id, p.unavailable_count, cap
                ));
            }
        }
        // An unavailable stretch longer than the Home-run cap forces a
        // too-long Home run.
        let mut stretch = 0u32;
        for d in 0..calendar.len() {
            if p.unavailable[d] {
                stretch += 1;
                if stretch > p.max_home_run {
                    return Some(format!(
                        "person `{}`: an unavailable stretch of {} days exceeds \
                         max_consecutive_home {}",
                        p.id, stretch, p.max_home_run
                    ));
                }
            } else {
                stretch = 0;
            }
        }
    }

    None
}
