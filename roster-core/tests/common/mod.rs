//! Shared test utilities for roster-core integration tests.
//!
//! Builders for requests and people, plus assertion helpers that re-check
//! every hard constraint from the returned schedule alone, the way an
//! external consumer would.

use chrono::NaiveDate;
use roster_core::models::{
    DutyStatus, Person, PersonSchedule, Policy, SolveOutcome, SolveRequest, Window,
};

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A request over `[start, end]` with a fixed seed and a test-friendly
/// time budget.
#[allow(dead_code)]
pub fn request(
    start: NaiveDate,
    end: NaiveDate,
    people: Vec<Person>,
    policy: Policy,
) -> SolveRequest {
    SolveRequest {
        window: Window { start, end },
        people,
        policy: Policy {
            time_budget_seconds: 30,
            ..policy
        },
        random_seed: Some(42),
    }
}

/// `n` plain people named p0..p{n-1}.
#[allow(dead_code)]
pub fn people(n: usize) -> Vec<Person> {
    (0..n)
        .map(|i| Person::new(format!("p{i}"), format!("Person {i}")))
        .collect()
}

/// Longest Base run in a person's schedule.
#[allow(dead_code)]
pub fn max_base_run(person: &PersonSchedule) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    for day in &person.schedule {
        if day.status == DutyStatus::Base {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Longest Home run in a person's schedule.
#[allow(dead_code)]
pub fn max_home_run(person: &PersonSchedule) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    for day in &person.schedule {
        if day.status == DutyStatus::Home {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// All maximal Base runs as `(start_index, length)` pairs.
#[allow(dead_code)]
pub fn base_blocks(person: &PersonSchedule) -> Vec<(usize, u32)> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    for (i, day) in person.schedule.iter().enumerate() {
        match (day.status, start) {
            (DutyStatus::Base, None) => start = Some(i),
            (DutyStatus::Home, Some(s)) => {
                blocks.push((s, (i - s) as u32));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        blocks.push((s, (person.schedule.len() - s) as u32));
    }
    blocks
}

/// Re-checks every hard constraint from the outcome's schedule, failing
/// with a descriptive message on the first violation.
#[allow(dead_code)]
pub fn assert_hard_constraints(request: &SolveRequest, outcome: &SolveOutcome) {
    let schedule = outcome
        .schedule
        .as_ref()
        .expect("a feasible outcome must carry a schedule");
    let policy = &request.policy;
    let window_length = request.window.length();

    for person in &request.people {
        let ps = schedule
            .people
            .get(&person.id)
            .unwrap_or_else(|| panic!("person {} missing from schedule", person.id));
        assert_eq!(
            ps.schedule.len() as u32,
            window_length,
            "person {} has a partial schedule",
            person.id
        );

        // Unavailability honored.
        for day in &ps.schedule {
            if person.unavailable_days.contains(&day.date) {
                assert_eq!(
                    day.status,
                    DutyStatus::Home,
                    "person {} scheduled on Base on unavailable day {}",
                    person.id,
                    day.date
                );
            }
        }

        // Consecutive caps, including the weekend-only tightening.
        let mut base_cap = person
            .max_consecutive_base
            .unwrap_or(policy.max_consecutive_base);
        if person.weekend_only {
            base_cap = base_cap.min(policy.weekend_only_max_base);
        }
        let home_cap = person
            .max_consecutive_home
            .unwrap_or(policy.max_consecutive_home);
        assert!(
            max_base_run(ps) <= base_cap,
            "person {} exceeds the consecutive-Base cap: {} > {}",
            person.id,
            max_base_run(ps),
            base_cap
        );
        assert!(
            max_home_run(ps) <= home_cap,
            "person {} exceeds the consecutive-Home cap: {} > {}",
            person.id,
            max_home_run(ps),
            home_cap
        );

        // Minimum block length.
        if !policy.allow_single_day_blocks {
            for (start, len) in base_blocks(ps) {
                let at_edge = start == 0 || start as u32 + len == window_length;
                if at_edge && policy.allow_edge_short_blocks {
                    continue;
                }
                assert!(
                    len >= policy.min_base_block,
                    "person {} has a Base block of {} days (minimum {})",
                    person.id,
                    len,
                    policy.min_base_block
                );
            }
        }

        // Totals caps.
        if let Some(cap) = policy.max_total_home {
            assert!(
                ps.total_home <= cap,
                "person {} has {} Home days (cap {})",
                person.id,
                ps.total_home,
                cap
            );
        }
        if let Some(cap) = policy.max_weekend_base {
            assert!(
                ps.total_weekend_base <= cap,
                "person {} has {} weekend Base days (cap {})",
                person.id,
                ps.total_weekend_base,
                cap
            );
        }

        // Totals agree with the day-by-day list.
        let counted_base = ps
            .schedule
            .iter()
            .filter(|d| d.status == DutyStatus::Base)
            .count() as u32;
        assert_eq!(counted_base, ps.total_base);
        assert_eq!(ps.total_base + ps.total_home, window_length);
    }

    // Daily coverage, cross-checked against the per-person schedules.
    for (&day, &count) in &schedule.daily_base_count {
        let recounted = schedule
            .people
            .values()
            .flat_map(|ps| &ps.schedule)
            .filter(|d| d.date == day && d.status == DutyStatus::Base)
            .count() as u32;
        assert_eq!(recounted, count, "headcount mismatch on {day}");
        if policy.strict_consecutive_limits {
            assert!(
                count >= policy.min_required_per_day,
                "day {day} has {count} on Base, required {}",
                policy.min_required_per_day
            );
        }
    }
}
