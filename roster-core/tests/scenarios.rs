//! End-to-end scheduling scenarios.
//!
//! Each test drives the full pipeline through the public API and checks the
//! returned schedule the way an external consumer would.

mod common;

use common::*;
use roster_core::models::{DutyStatus, Policy, SolveStatus};
use roster_core::{calendar_export, flat_export, solve};

#[test]
fn trivial_week_rotates_three_people() {
    let req = request(
        date(2025, 1, 1),
        date(2025, 1, 7),
        people(3),
        Policy {
            min_required_per_day: 1,
            max_consecutive_base: 7,
            min_base_block: 1,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_hard_constraints(&req, &outcome);
    let schedule = outcome.schedule.unwrap();
    for (_, count) in &schedule.daily_base_count {
        assert!(*count >= 1);
    }
}

#[test]
fn unavailable_day_forces_home_without_breaking_coverage() {
    let mut members = people(3);
    members[0].unavailable_days = vec![date(2025, 1, 3)];
    let req = request(
        date(2025, 1, 1),
        date(2025, 1, 7),
        members,
        Policy {
            min_required_per_day: 1,
            max_consecutive_base: 7,
            min_base_block: 1,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_hard_constraints(&req, &outcome);
    let schedule = outcome.schedule.unwrap();
    let blocked = &schedule.people["p0"];
    let jan3 = blocked
        .schedule
        .iter()
        .find(|d| d.date == date(2025, 1, 3))
        .unwrap();
    assert_eq!(jan3.status, DutyStatus::Home);
    assert!(schedule.daily_base_count[&date(2025, 1, 3)] >= 1);
}

#[test]
fn tight_coverage_puts_both_people_on_base_throughout() {
    let req = request(
        date(2025, 2, 1),
        date(2025, 2, 10),
        people(2),
        Policy {
            min_required_per_day: 2,
            max_consecutive_base: 10,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_hard_constraints(&req, &outcome);
    let schedule = outcome.schedule.unwrap();
    for ps in schedule.people.values() {
        assert_eq!(ps.total_base, 10);
        assert_eq!(ps.total_home, 0);
    }
}

#[test]
fn impossible_coverage_reports_infeasible_with_diagnostics() {
    let req = request(
        date(2025, 3, 1),
        date(2025, 3, 5),
        people(2),
        Policy {
            min_required_per_day: 3,
            strict_consecutive_limits: true,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();

    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.schedule.is_none());
    assert!(outcome.diagnostics.availability_ratio < 1.0);
}

#[test]
fn min_block_rules_out_short_runs() {
    let req = request(
        date(2025, 4, 1),
        date(2025, 4, 14),
        people(5),
        Policy {
            min_required_per_day: 2,
            min_base_block: 3,
            allow_single_day_blocks: false,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();

    assert!(outcome.status.has_schedule(), "got {:?}", outcome.status);
    assert_hard_constraints(&req, &outcome);
    let schedule = outcome.schedule.unwrap();
    for ps in schedule.people.values() {
        for (_, len) in base_blocks(ps) {
            assert!(len >= 3, "found a Base block of {len} days");
        }
    }
}

#[test]
fn weekend_only_person_works_mostly_weekends() {
    let mut members = people(4);
    let mut weekender = roster_core::models::Person::new("w", "Weekender");
    weekender.weekend_only = true;
    members.push(weekender);

    let req = request(
        date(2025, 5, 1),
        date(2025, 5, 31),
        members,
        Policy {
            min_required_per_day: 2,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();

    assert!(outcome.status.has_schedule(), "got {:?}", outcome.status);
    assert_hard_constraints(&req, &outcome);
    let schedule = outcome.schedule.unwrap();
    let ps = &schedule.people["w"];
    assert!(ps.total_base > 0, "weekend-only person never worked");
    let weekend_share = ps.total_weekend_base as f64 / ps.total_base as f64;
    assert!(
        weekend_share >= 0.6,
        "only {:.0}% of the weekend-only person's duty fell on weekends",
        weekend_share * 100.0
    );
    assert!(max_base_run(ps) <= req.policy.weekend_only_max_base);
}

#[test]
fn identical_seed_reproduces_the_schedule() {
    let build = || {
        request(
            date(2025, 1, 1),
            date(2025, 1, 14),
            people(4),
            Policy {
                min_required_per_day: 2,
                min_base_block: 2,
                ..Policy::default()
            },
        )
    };
    let first = solve(&build()).unwrap();
    let second = solve(&build()).unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.schedule, second.schedule);
    assert_eq!(first.diagnostics.objective, second.diagnostics.objective);
}

#[test]
fn shortage_mode_records_deficits_instead_of_failing() {
    // Two people cannot cover three slots; with slack enabled the solve
    // still returns a schedule and the deficit shows up in the headcounts.
    let req = request(
        date(2025, 3, 1),
        date(2025, 3, 5),
        people(2),
        Policy {
            min_required_per_day: 3,
            strict_consecutive_limits: false,
            min_base_block: 1,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();

    assert!(outcome.status.has_schedule(), "got {:?}", outcome.status);
    let schedule = outcome.schedule.unwrap();
    for (_, &count) in &schedule.daily_base_count {
        assert!(count <= 2);
    }
}

#[test]
fn total_home_cap_is_honored() {
    let req = request(
        date(2025, 1, 1),
        date(2025, 1, 10),
        people(3),
        Policy {
            min_required_per_day: 1,
            min_base_block: 2,
            max_total_home: Some(7),
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();
    assert!(outcome.status.has_schedule(), "got {:?}", outcome.status);
    assert_hard_constraints(&req, &outcome);
}

#[test]
fn weekend_base_cap_is_honored() {
    let req = request(
        date(2025, 5, 1),
        date(2025, 5, 14),
        people(4),
        Policy {
            min_required_per_day: 1,
            min_base_block: 2,
            max_weekend_base: Some(2),
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();
    assert!(outcome.status.has_schedule(), "got {:?}", outcome.status);
    assert_hard_constraints(&req, &outcome);
}

#[test]
fn difficulty_escalates_with_heavy_constraints() {
    let easy = request(
        date(2025, 1, 1),
        date(2025, 1, 10),
        people(5),
        Policy {
            min_required_per_day: 1,
            ..Policy::default()
        },
    );
    let easy_outcome = solve(&easy).unwrap();
    assert_eq!(
        easy_outcome.diagnostics.difficulty,
        roster_core::models::Difficulty::Medium
    );
    assert_eq!(easy_outcome.diagnostics.heavy_count, 0);

    // Make one person unavailable more than 40% of the window.
    let mut members = people(5);
    members[0].unavailable_days = (1..=5).map(|d| date(2025, 1, d)).collect();
    let harder = request(date(2025, 1, 1), date(2025, 1, 10), members, easy.policy.clone());
    let harder_outcome = solve(&harder).unwrap();
    assert!(harder_outcome.diagnostics.heavy_count >= 1);
    assert!(harder_outcome.diagnostics.difficulty > easy_outcome.diagnostics.difficulty);
}

#[test]
fn calendar_export_matches_the_schedule() {
    let req = request(
        date(2025, 1, 1),
        date(2025, 1, 7),
        people(3),
        Policy {
            min_required_per_day: 1,
            min_base_block: 1,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();
    let schedule = outcome.schedule.unwrap();
    let calendar = calendar_export(&req, &schedule);

    assert_eq!(calendar.len(), 7);
    for (day, entry) in &calendar {
        assert_eq!(
            entry.on_base.len() as u32,
            schedule.daily_base_count[day],
            "on_base list disagrees with headcount on {day}"
        );
        assert_eq!(entry.on_base.len() + entry.at_home.len(), 3);
    }
}

#[test]
fn flat_export_covers_the_whole_grid() {
    let req = request(
        date(2025, 1, 1),
        date(2025, 1, 7),
        people(3),
        Policy {
            min_required_per_day: 1,
            min_base_block: 1,
            ..Policy::default()
        },
    );
    let outcome = solve(&req).unwrap();
    let schedule = outcome.schedule.unwrap();
    let flat = flat_export(&req, &schedule);
    assert_eq!(flat.len(), 21);
    // Input order is preserved person-major.
    assert_eq!(flat[0].person.id, "p0");
    assert_eq!(flat[7].person.id, "p1");
}
