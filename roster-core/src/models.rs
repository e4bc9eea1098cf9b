//! Data models and types for the roster-core API.
//!
//! This module contains all the public data structures used to define a
//! scheduling problem, configure the engine, and receive results. The API is
//! designed to be serializable (JSON) for easy integration with web services,
//! batch drivers, and configuration files.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete input specification for one scheduling run.
///
/// This is the root structure that contains everything needed to compute a
/// roster: the date window, the people to schedule, the policy governing
/// fairness and limits, and an optional seed for reproducible output.
///
/// # Example
///
/// ```no_run
/// use roster_core::models::*;
/// use chrono::NaiveDate;
///
/// let request = SolveRequest {
///     window: Window {
///         start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///         end: NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
///     },
///     people: vec![
///         Person::new("p1", "Dana"),
///         Person::new("p2", "Omer"),
///         Person::new("p3", "Noa"),
///     ],
///     policy: Policy {
///         min_required_per_day: 1,
///         ..Policy::default()
///     },
///     random_seed: Some(42),
/// };
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SolveRequest {
    /// The inclusive date range being scheduled
    pub window: Window,
    /// The roster members to assign
    pub people: Vec<Person>,
    /// Scheduling policy; every field has a sensible default
    #[serde(default)]
    pub policy: Policy,
    /// Seed for the search's random number generator. Identical inputs plus
    /// an identical seed produce an identical schedule. If `None`, the seed
    /// is drawn from entropy and outputs may differ run-to-run.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// An inclusive date range. `start` must not be after `end`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First day of the window
    pub start: NaiveDate,
    /// Last day of the window (inclusive)
    pub end: NaiveDate,
}

impl Window {
    /// Number of days in the window, counting both endpoints.
    ///
    /// Returns 0 when `end < start`; validation rejects such windows before
    /// the engine runs.
    pub fn length(&self) -> u32 {
        if self.end < self.start {
            return 0;
        }
        ((self.end - self.start).num_days() + 1) as u32
    }
}

/// A member of the roster.
///
/// A person is immutable over a single solve. Unavailable days force Home on
/// those days; the two role flags steer fairness handling; the optional
/// fields override the corresponding policy defaults for this person only.
///
/// # Example
///
/// ```no_run
/// use roster_core::models::Person;
/// use chrono::NaiveDate;
///
/// let mut p = Person::new("s-17", "Avi");
/// p.unavailable_days = vec![NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()];
/// p.weekend_only = true;
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Person {
    /// Opaque identifier, unique within a solve
    pub id: String,
    /// Display name, unique within a solve (callers disambiguate duplicates)
    pub name: String,
    /// Days on which this person cannot be on Base. Entries outside the
    /// window are dropped silently.
    #[serde(default)]
    pub unavailable_days: Vec<NaiveDate>,
    /// Caller hint that this person has unusually dense constraints and
    /// deserves a widened Home allowance. The engine may also turn this on
    /// automatically (never off) when constraint density is high.
    #[serde(default)]
    pub exceptional: bool,
    /// Caller hint that this person should be steered toward weekend Base
    /// duty, with a reduced consecutive-Base cap.
    #[serde(default)]
    pub weekend_only: bool,
    /// Per-person override of the policy's Base-day target
    #[serde(default)]
    pub base_target: Option<u32>,
    /// Per-person override of the policy's Home-day target
    #[serde(default)]
    pub home_target: Option<u32>,
    /// Per-person override of the consecutive-Base hard cap
    #[serde(default)]
    pub max_consecutive_base: Option<u32>,
    /// Per-person override of the consecutive-Home hard cap
    #[serde(default)]
    pub max_consecutive_home: Option<u32>,
}

impl Person {
    /// Convenience constructor with no constraints, flags, or overrides.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Person {
            id: id.into(),
            name: name.into(),
            unavailable_days: Vec::new(),
            exceptional: false,
            weekend_only: false,
            base_target: None,
            home_target: None,
            max_consecutive_base: None,
            max_consecutive_home: None,
        }
    }
}

/// A day of the week, used to configure which days count as weekend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekendDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl WeekendDay {
    /// The corresponding `chrono` weekday.
    pub fn to_weekday(self) -> Weekday {
        match self {
            WeekendDay::Mon => Weekday::Mon,
            WeekendDay::Tue => Weekday::Tue,
            WeekendDay::Wed => Weekday::Wed,
            WeekendDay::Thu => Weekday::Thu,
            WeekendDay::Fri => Weekday::Fri,
            WeekendDay::Sat => Weekday::Sat,
            WeekendDay::Sun => Weekday::Sun,
        }
    }

    /// Whether `date` falls on this weekday.
    pub fn matches(self, date: NaiveDate) -> bool {
        date.weekday() == self.to_weekday()
    }
}

/// Scheduling policy: targets, hard caps, coverage, and objective toggles.
///
/// Every field carries a default so callers can specify only what they care
/// about. Defaults mirror a typical two-state duty rotation: blocks of at
/// least three Base days, at most seven consecutive Base days, at most ten
/// consecutive Home days, weekend defined as Friday plus Saturday.
///
/// # Example
///
/// ```no_run
/// use roster_core::models::Policy;
///
/// let policy = Policy {
///     min_required_per_day: 4,
///     max_consecutive_base: 5,
///     min_base_block: 2,
///     ..Policy::default()
/// };
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Policy {
    /// Aspirational Base-day count per person. When unset, a fair share is
    /// derived from required coverage and headcount.
    pub default_base_target: Option<u32>,
    /// Aspirational Home-day count per person. When unset, derived as the
    /// window length minus the Base fair share.
    pub default_home_target: Option<u32>,
    /// Hard cap on consecutive Base days per person (at least 1)
    pub max_consecutive_base: u32,
    /// Hard cap on consecutive Home days per person (at least 1)
    pub max_consecutive_home: u32,
    /// Every maximal Base run must be at least this long (at least 1), unless
    /// `allow_single_day_blocks` turns the rule into a soft preference
    pub min_base_block: u32,
    /// Minimum number of people on Base each day
    pub min_required_per_day: u32,
    /// Cap on total Home days per person across the window (inclusive)
    pub max_total_home: Option<u32>,
    /// Cap on weekend Base days per person (inclusive)
    pub max_weekend_base: Option<u32>,
    /// Unavailable-day count above which a person is auto-marked exceptional
    pub exceptional_threshold: u32,
    /// Extra Home-day allowance, in percent, granted to exceptional people
    pub constraint_safety_margin_pct: u32,
    /// Consecutive-Base cap applied to weekend-only people (combined with
    /// the regular cap by taking the minimum)
    pub weekend_only_max_base: u32,
    /// Permit Base runs shorter than `min_base_block`, penalized softly
    /// instead of forbidden
    pub allow_single_day_blocks: bool,
    /// Permit Base runs shorter than `min_base_block` when they touch the
    /// window edge
    pub allow_edge_short_blocks: bool,
    /// When true, daily coverage is a hard constraint. When false, shortage
    /// slack is allowed and penalized.
    pub strict_consecutive_limits: bool,
    /// Automatically widen allowances for people with dense constraints
    pub auto_adjust_for_constraints: bool,
    /// Include the Home-target deviation term in the objective
    pub enable_home_balance_penalty: bool,
    /// Include the weekend-fairness term in the objective
    pub enable_weekend_fairness: bool,
    /// Weight of the Home-target deviation term (non-negative)
    pub home_balance_weight: f64,
    /// Weight of the weekend-fairness term (non-negative)
    pub weekend_fairness_weight: f64,
    /// Wall-clock cap on the search, in seconds (at least 1)
    pub time_budget_seconds: u64,
    /// Which weekdays count as weekend
    pub weekend_days: Vec<WeekendDay>,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            default_base_target: None,
            default_home_target: None,
            max_consecutive_base: 7,
            max_consecutive_home: 10,
            min_base_block: 3,
            min_required_per_day: 1,
            max_total_home: None,
            max_weekend_base: None,
            exceptional_threshold: 10,
            constraint_safety_margin_pct: 25,
            weekend_only_max_base: 14,
            allow_single_day_blocks: false,
            allow_edge_short_blocks: false,
            strict_consecutive_limits: true,
            auto_adjust_for_constraints: true,
            enable_home_balance_penalty: true,
            enable_weekend_fairness: true,
            home_balance_weight: 1.0,
            weekend_fairness_weight: 1.0,
            time_budget_seconds: 30,
            weekend_days: vec![WeekendDay::Fri, WeekendDay::Sat],
        }
    }
}

/// The two mutually exclusive daily states.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyStatus {
    /// On-site duty
    Base,
    /// At home
    Home,
}

/// Terminal status of a solve, following CP solver conventions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search converged on a feasible schedule before the deadline
    Optimal,
    /// A feasible schedule was found, but the deadline cut the search off
    Feasible,
    /// No assignment can satisfy the hard constraints
    Infeasible,
    /// The budget ran out before a feasible schedule was found
    Unknown,
    /// The backend failed or the result audit found a violated constraint
    Error,
}

impl SolveStatus {
    /// Whether this status carries a schedule in the outcome.
    pub fn has_schedule(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Difficulty class assigned by the problem analyzer.
///
/// The class picks the penalty schedule the objective uses: harder classes
/// escalate every penalty so the search prioritizes structural validity over
/// fine-grained balance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Medium,
    Hard,
    Extreme,
    Apocalyptic,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Extreme => "EXTREME",
            Difficulty::Apocalyptic => "APOCALYPTIC",
        };
        f.write_str(s)
    }
}

/// Metadata about a solve, returned regardless of status.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Diagnostics {
    /// Difficulty class the analyzer assigned
    pub difficulty: Difficulty,
    /// Total available person-days divided by total required person-days
    pub availability_ratio: f64,
    /// Number of people whose unavailability density exceeds 0.4
    pub heavy_count: u32,
    /// Wall-clock time the solve consumed, in seconds
    pub wall_time_seconds: f64,
    /// Objective value of the returned schedule, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
    /// Failure detail when the status is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One day of one person's schedule.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAssignment {
    /// Calendar date
    pub date: NaiveDate,
    /// Base or Home
    pub status: DutyStatus,
    /// Whether the date falls in the configured weekend set
    pub weekend: bool,
}

/// A person's full schedule over the window, with summary totals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PersonSchedule {
    /// Day-by-day assignments, ordered by date
    pub schedule: Vec<DayAssignment>,
    /// Count of Base days
    pub total_base: u32,
    /// Count of Home days
    pub total_home: u32,
    /// Count of Base days falling on weekend dates
    pub total_weekend_base: u32,
}

/// The projected roster: per-person schedules plus per-day headcounts.
///
/// Keys are person ids; `daily_base_count` maps each date in the window to
/// the number of people on Base that day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RosterSchedule {
    /// Per-person schedules, keyed by person id
    pub people: BTreeMap<String, PersonSchedule>,
    /// Number of people on Base for each day of the window
    pub daily_base_count: BTreeMap<NaiveDate, u32>,
}

/// The result of a solve: status, diagnostics, and (when feasible) the
/// projected schedule.
///
/// `schedule` is present exactly when `status` is `Optimal` or `Feasible`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SolveOutcome {
    /// Terminal solver status
    pub status: SolveStatus,
    /// Analyzer and driver metadata
    pub diagnostics: Diagnostics,
    /// The roster, when one was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<RosterSchedule>,
}

/// Minimal person reference used by the export shapes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PersonRef {
    /// Person id
    pub id: String,
    /// Display name
    pub name: String,
}

/// One calendar day in the export consumed by downstream UIs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDay {
    /// People on Base this day, in input order
    pub on_base: Vec<PersonRef>,
    /// People at Home this day, in input order
    pub at_home: Vec<PersonRef>,
}

/// One record of the flat export: a single (date, person) assignment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlatAssignment {
    /// Calendar date
    pub assignment_date: NaiveDate,
    /// Whether the person is on Base this day
    pub is_on_base: bool,
    /// The person assigned
    pub person: PersonRef,
}

/// Progress update emitted during the search.
///
/// Sent periodically to the progress callback, and once more after the final
/// audit so the last update always matches the returned outcome.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Current iteration (0-based)
    pub iteration: u64,
    /// Total iterations the cooling schedule is planned over
    pub planned_iterations: u64,
    /// Current annealing temperature
    pub temperature: f64,
    /// Cost of the current working schedule
    pub current_cost: f64,
    /// Cost of the best schedule found so far
    pub best_cost: f64,
    /// Hard-constraint violations in the current working schedule
    pub hard_violations: u64,
    /// Hard-constraint violations in the best schedule found so far
    pub best_hard_violations: u64,
    /// Iterations since the best schedule last improved
    pub no_improvement_count: u64,
    /// Seconds elapsed since the search started
    pub elapsed_seconds: f64,
}

/// Callback type for receiving progress updates during a solve.
///
/// Return `true` to continue searching, `false` to request early
/// termination. A cancelled solve reports `Unknown` and returns no partial
/// schedule.
pub type ProgressCallback = Box<dyn Fn(&ProgressUpdate) -> bool + Send>;
