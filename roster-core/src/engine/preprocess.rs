//! Person preprocessing.
//!
//! Turns the caller-facing `Person` records into `EffectivePerson`
//! snapshots: unavailability clipped to the window and converted to day
//! indices, role flags resolved, and per-person caps and targets made
//! concrete. The input records are never mutated; auto-adjustment only ever
//! widens allowances and flags are monotonic (a caller-set flag is never
//! cleared).

use crate::calendar::Calendar;
use crate::models::SolveRequest;

/// A person as the model sees them: all policy resolution already applied.
/// Order matches the request's people list.
#[derive(Debug, Clone)]
pub struct EffectivePerson {
    pub id: String,
    pub name: String,
    /// Per-day unavailability, indexed by calendar day
    pub unavailable: Vec<bool>,
    /// Number of unavailable days inside the window
    pub unavailable_count: u32,
    /// Effective exceptional flag (caller hint or density-triggered)
    pub exceptional: bool,
    pub weekend_only: bool,
    /// Home-day target used by the balance objective
    pub home_target: u32,
    /// Effective consecutive-Base hard cap
    pub max_base_run: u32,
    /// Effective consecutive-Home hard cap
    pub max_home_run: u32,
}

impl EffectivePerson {
    /// Unavailable-day density over the window.
    pub fn density(&self, window_length: u32) -> f64 {
        if window_length == 0 {
            return 0.0;
        }
        self.unavailable_count as f64 / window_length as f64
    }
}

/// Builds the effective snapshot for every person in the request.
pub fn effective_people(request: &SolveRequest, calendar: &Calendar) -> Vec<EffectivePerson> {
    let policy = &request.policy;
    let window_length = calendar.len() as u32;
    let fair_home = derived_home_target(request, window_length);

    request
        .people
        .iter()
        .map(|person| {
            let mut unavailable = vec![false; calendar.len()];
            for &date in &person.unavailable_days {
                if let Some(d) = calendar.index_of(date) {
                    unavailable[d] = true;
                }
            }
            let unavailable_count = unavailable.iter().filter(|&&u| u).count() as u32;

            let mut exceptional = person.exceptional;
            if policy.auto_adjust_for_constraints && unavailable_count > policy.exceptional_threshold
            {
                exceptional = true;
            }

            let mut home_target = person
                .home_target
                .or(person.base_target.map(|b| window_length.saturating_sub(b)))
                .or(policy.default_home_target)
                .unwrap_or(fair_home);
            let has_override = person.home_target.is_some() || person.base_target.is_some();
            if exceptional && !has_override {
                let margin = (home_target as u64 * policy.constraint_safety_margin_pct as u64)
                    .div_ceil(100) as u32;
                home_target = (home_target + margin).min(window_length);
            }

            let mut max_base_run = person
                .max_consecutive_base
                .unwrap_or(policy.max_consecutive_base);
            if person.weekend_only {
                max_base_run = max_base_run.min(policy.weekend_only_max_base);
            }
            let max_home_run = person
                .max_consecutive_home
                .unwrap_or(policy.max_consecutive_home);

            EffectivePerson {
                id: person.id.clone(),
                name: person.name.clone(),
                unavailable,
                unavailable_count,
                exceptional,
                weekend_only: person.weekend_only,
                home_target,
                max_base_run,
                max_home_run,
            }
        })
        .collect()
}

/// Home target when neither the person nor the policy sets one: window
/// length minus the fair Base share implied by coverage and headcount.
fn derived_home_target(request: &SolveRequest, window_length: u32) -> u32 {
    if let Some(base) = request.policy.default_base_target {
        return window_length.saturating_sub(base);
    }
    let headcount = request.people.len().max(1) as u32;
    let required = window_length as u64 * request.policy.min_required_per_day as u64;
    let fair_base = required.div_ceil(headcount as u64) as u32;
    window_length.saturating_sub(fair_base.min(window_length))
}
