//! Solution projection: from grid values to the API result shapes.

use super::model::{Grid, RosterModel};
use crate::models::{
    CalendarDay, DayAssignment, DutyStatus, FlatAssignment, PersonRef, PersonSchedule,
    RosterSchedule, SolveRequest,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Projects a grid into per-person schedules and per-day headcounts.
pub fn project(model: &RosterModel, grid: &Grid) -> RosterSchedule {
    let mut people = BTreeMap::new();
    let mut daily_base_count: BTreeMap<NaiveDate, u32> =
        model.calendar.iter().map(|date| (date, 0)).collect();

    for (idx, person) in model.people.iter().enumerate() {
        let mut schedule = Vec::with_capacity(model.num_days());
        let mut total_base = 0u32;
        let mut total_weekend_base = 0u32;
        for d in 0..model.num_days() {
            let date = model.calendar.date(d);
            let weekend = model.calendar.is_weekend(d);
            let on_base = grid.get(idx, d);
            if on_base {
                total_base += 1;
                if weekend {
                    total_weekend_base += 1;
                }
                *daily_base_count.entry(date).or_insert(0) += 1;
            }
            schedule.push(DayAssignment {
                date,
                status: if on_base {
                    DutyStatus::Base
                } else {
                    DutyStatus::Home
                },
                weekend,
            });
        }
        people.insert(
            person.id.clone(),
            PersonSchedule {
                schedule,
                total_base,
                total_home: model.num_days() as u32 - total_base,
                total_weekend_base,
            },
        );
    }

    RosterSchedule {
        people,
        daily_base_count,
    }
}

/// Transforms a schedule into the per-date shape downstream UIs consume:
/// each date maps to the people on Base and at Home, in input order.
pub fn calendar_export(
    request: &SolveRequest,
    schedule: &RosterSchedule,
) -> BTreeMap<NaiveDate, CalendarDay> {
    let mut calendar: BTreeMap<NaiveDate, CalendarDay> = schedule
        .daily_base_count
        .keys()
        .map(|&date| (date, CalendarDay::default()))
        .collect();

    for person in &request.people {
        let Some(person_schedule) = schedule.people.get(&person.id) else {
            continue;
        };
        for day in &person_schedule.schedule {
            let entry = calendar.entry(day.date).or_default();
            let reference = PersonRef {
                id: person.id.clone(),
                name: person.name.clone(),
            };
            match day.status {
                DutyStatus::Base => entry.on_base.push(reference),
                DutyStatus::Home => entry.at_home.push(reference),
            }
        }
    }

    calendar
}

/// Flattens a schedule into one record per (date, person) pair.
pub fn flat_export(request: &SolveRequest, schedule: &RosterSchedule) -> Vec<FlatAssignment> {
    let mut flat = Vec::new();
    for person in &request.people {
        let Some(person_schedule) = schedule.people.get(&person.id) else {
            continue;
        };
        for day in &person_schedule.schedule {
            flat.push(FlatAssignment {
                assignment_date: day.date,
                is_on_base: day.status == DutyStatus::Base,
                person: PersonRef {
                    id: person.id.clone(),
                    name: person.name.clone(),
                },
            });
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::engine::penalties::PenaltySchedule;
    use crate::engine::preprocess;
    use crate::models::{Difficulty, Person, Policy, Window};
    use chrono::NaiveDate;

    fn setup() -> (SolveRequest, RosterModel, Grid) {
        let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(); // a Monday
        let request = SolveRequest {
            window: Window {
                start,
                end: start + chrono::Duration::days(6),
            },
            people: vec![Person::new("p1", "Dana"), Person::new("p2", "Omer")],
            policy: Policy::default(),
            random_seed: None,
        };
        let calendar = Calendar::new(&request.window, &request.policy.weekend_days);
        let effective = preprocess::effective_people(&request, &calendar);
        let model = RosterModel::new(
            calendar,
            effective,
            &request.policy,
            PenaltySchedule::for_difficulty(Difficulty::Medium),
        );
        let mut grid = Grid::new(2, 7);
        // p1 works Mon-Wed, p2 works Thu-Sun.
        for d in 0..3 {
            grid.set(0, d, true);
        }
        for d in 3..7 {
            grid.set(1, d, true);
        }
        (request, model, grid)
    }

    #[test]
    fn totals_and_headcounts_match_the_grid() {
        let (_, model, grid) = setup();
        let schedule = project(&model, &grid);

        let p1 = &schedule.people["p1"];
        assert_eq!(p1.total_base, 3);
        assert_eq!(p1.total_home, 4);
        assert_eq!(p1.total_weekend_base, 0);

        let p2 = &schedule.people["p2"];
        assert_eq!(p2.total_base, 4);
        // Friday (2025-06-06) and Saturday (2025-06-07) fall in p2's run.
        assert_eq!(p2.total_weekend_base, 2);

        for (_, count) in schedule.daily_base_count.iter() {
            assert_eq!(*count, 1);
        }
    }

    #[test]
    fn schedules_are_ordered_by_date() {
        let (_, model, grid) = setup();
        let schedule = project(&model, &grid);
        for person in schedule.people.values() {
            for pair in person.schedule.windows(2) {
                assert!(pair[0].date < pair[1].date);
            }
        }
    }

    #[test]
    fn calendar_export_splits_each_day_in_input_order() {
        let (request, model, grid) = setup();
        let schedule = project(&model, &grid);
        let calendar = calendar_export(&request, &schedule);

        let first = &calendar[&NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()];
        assert_eq!(first.on_base.len(), 1);
        assert_eq!(first.on_base[0].name, "Dana");
        assert_eq!(first.at_home[0].name, "Omer");

        let last = &calendar[&NaiveDate::from_ymd_opt(2025, 6, 8).unwrap()];
        assert_eq!(last.on_base[0].id, "p2");
    }

    #[test]
    fn flat_export_has_one_record_per_cell() {
        let (request, model, grid) = setup();
        let schedule = project(&model, &grid);
        let flat = flat_export(&request, &schedule);
        assert_eq!(flat.len(), 14);
        let on_base = flat.iter().filter(|r| r.is_on_base).count();
        assert_eq!(on_base, 7);
    }
}
