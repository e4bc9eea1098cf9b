//! Greedy initial roster construction.
//!
//! Builds a starting grid by sweeping the window day by day, extending
//! planned Base blocks and opening new ones when coverage or the Home-run
//! cap demands it. The sweep is deterministic: candidates are ranked by a
//! stable key, so the same request always yields the same starting point.
//! The result is usually hard-feasible already; when constraints are too
//! tight for the greedy pass, the search inherits the residual violations
//! and descends from there.

use super::model::{Grid, RosterModel};

/// Builds the initial grid for `model`.
pub fn build_initial(model: &RosterModel) -> Grid {
    let n = model.num_people();
    let days = model.num_days();
    let mut grid = Grid::new(n, days);

    let mut run_base = vec![0u32; n];
    let mut run_home = vec![0u32; n];
    let mut total_base = vec![0u32; n];
    // Remaining days of a block opened earlier that should keep extending.
    let mut planned = vec![0u32; n];

    for d in 0..days {
        let weekend = model.calendar.is_weekend(d);
        let mut on_base = vec![false; n];
        let mut count = 0u32;

        // Extend blocks opened on earlier days. A block interrupted by
        // unavailability or the run cap is abandoned rather than resumed.
        for p in 0..n {
            if planned[p] == 0 {
                continue;
            }
            if !model.people[p].unavailable[d] && run_base[p] < model.people[p].max_base_run {
                on_base[p] = true;
                count += 1;
                planned[p] -= 1;
            } else {
                planned[p] = 0;
            }
        }

        // A person at the Home-run cap must open a block now if they can.
        for p in 0..n {
            if on_base[p] || model.people[p].unavailable[d] {
                continue;
            }
            if run_home[p] >= model.people[p].max_home_run {
                planned[p] = block_plan(model, p, d);
                on_base[p] = true;
                count += 1;
            }
        }

        // Fill remaining coverage. A candidate either continues the run it
        // is already in (always legal while under the cap) or opens a new
        // block, which requires enough available runway for a full-length
        // block.
        while count < model.min_required {
            match best_candidate(model, d, weekend, &on_base, &total_base, &run_base, &run_home) {
                Some(p) => {
                    if run_base[p] == 0 {
                        planned[p] = block_plan(model, p, d);
                    }
                    on_base[p] = true;
                    count += 1;
                }
                None => break, // nobody assignable: shortage stands
            }
        }

        for p in 0..n {
            if on_base[p] {
                grid.set(p, d, true);
                run_base[p] += 1;
                run_home[p] = 0;
                total_base[p] += 1;
            } else {
                run_home[p] += 1;
                run_base[p] = 0;
            }
        }
    }

    grid
}

/// Remaining length of a block opened at day `d` (today excluded).
fn block_plan(model: &RosterModel, p: usize, d: usize) -> u32 {
    let days_left = (model.num_days() - d) as u32;
    let len = model
        .min_block
        .min(model.people[p].max_base_run)
        .min(days_left)
        .max(1);
    len - 1
}

/// The best person to put on Base on day `d`, or `None`.
///
/// Ranking favors people with the fewest Base days so far, breaking ties by
/// the longest current Home run, then input order. Weekend-only people are
/// deprioritized on weekdays. People mid-run always qualify (under the run
/// cap); fresh starts qualify only with full-block runway, falling back to
/// runway-less starts when nobody else can cover the day.
fn best_candidate(
    model: &RosterModel,
    d: usize,
    weekend: bool,
    on_base: &[bool],
    total_base: &[u32],
    run_base: &[u32],
    run_home: &[u32],
) -> Option<usize> {
    for require_runway in [true, false] {
        let mut best: Option<(u32, u32, i64, usize)> = None;
        for p in 0..model.num_people() {
            let person = &model.people[p];
            if on_base[p] || person.unavailable[d] || run_base[p] >= person.max_base_run {
                continue;
            }
            if run_base[p] == 0 && require_runway && !has_runway(model, p, d) {
                continue;
            }
            let mismatch = u32::from(person.weekend_only && !weekend);
            let key = (mismatch, total_base[p], -(run_home[p] as i64), p);
            if best.map_or(true, |b| key < b) {
                best = Some(key);
            }
        }
        if let Some((_, _, _, p)) = best {
            return Some(p);
        }
    }
    None
}

/// Whether person `p` can sustain a minimum-length block starting at `d`.
fn has_runway(model: &RosterModel, p: usize, d: usize) -> bool {
    let person = &model.people[p];
    let len = model.min_block.min(person.max_base_run) as usize;
    if d + len > model.num_days() {
        return model.allow_edge_short_blocks;
    }
    (d..d + len).all(|day| !person.unavailable[day])
}
