use crate::{
    problem::location::LocationIdx,
    solver::{OrderingProblem, Route, SolveError, SolveStrategy},
    utils::cancel::CancelToken,
};

/// Held-Karp bitmask DP. Exact like brute force but O(2^M * M^2): state is
/// (visited subset, current free location), value is the minimal duration to
/// reach that state from the start.
pub(super) fn solve(
    problem: &OrderingProblem<'_>,
    free: &[LocationIdx],
    cancel: &CancelToken,
) -> Result<Route, SolveError> {
    match problem.start {
        Some(start) => solve_from(problem, start, free, cancel),
        // No pinned start: run the DP once per start candidate and keep the
        // cheapest result.
        None => {
            let mut best: Option<Route> = None;

            for (index, &start) in free.iter().enumerate() {
                let mut rest = free.to_vec();
                rest.remove(index);

                match solve_from(problem, start, &rest, cancel) {
                    Ok(route) => {
                        if !best
                            .as_ref()
                            .is_some_and(|b| b.total_duration_secs <= route.total_duration_secs)
                        {
                            best = Some(route);
                        }
                    }
                    Err(SolveError::Unsolvable) => {}
                    Err(err) => return Err(err),
                }
            }

            best.ok_or(SolveError::Unsolvable)
        }
    }
}

fn solve_from(
    problem: &OrderingProblem<'_>,
    start: LocationIdx,
    free: &[LocationIdx],
    cancel: &CancelToken,
) -> Result<Route, SolveError> {
    let m = free.len();

    if m == 0 {
        let path = problem.assemble_path(Some(start), &[]);
        return problem
            .route(path, SolveStrategy::DynamicProgramming)
            .ok_or(SolveError::Unsolvable);
    }

    let num_states = 1usize << m;
    let mut costs = vec![f64::INFINITY; num_states * m];
    let mut parents = vec![usize::MAX; num_states * m];

    for (i, &location) in free.iter().enumerate() {
        if let Some(leg) = problem.matrix.leg(start, location) {
            costs[(1 << i) * m + i] = leg.duration_secs;
        }
    }

    for mask in 1..num_states {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }

        for last in 0..m {
            if mask & (1 << last) == 0 {
                continue;
            }

            let cost = costs[mask * m + last];
            if cost.is_infinite() {
                continue;
            }

            for next in 0..m {
                if mask & (1 << next) != 0 {
                    continue;
                }

                let Some(leg) = problem.matrix.leg(free[last], free[next]) else {
                    continue;
                };

                let next_mask = mask | (1 << next);
                let candidate = cost + leg.duration_secs;
                if candidate < costs[next_mask * m + next] {
                    costs[next_mask * m + next] = candidate;
                    parents[next_mask * m + next] = last;
                }
            }
        }
    }

    let full = num_states - 1;
    let mut best: Option<(f64, usize)> = None;

    for last in 0..m {
        let cost = costs[full * m + last];
        if cost.is_infinite() {
            continue;
        }

        let Some(closing) = closing_duration(problem, start, free[last]) else {
            continue;
        };

        let total = cost + closing;
        if !best.is_some_and(|(b, _)| b <= total) {
            best = Some((total, last));
        }
    }

    let (_, mut last) = best.ok_or(SolveError::Unsolvable)?;

    let mut order = Vec::with_capacity(m);
    let mut mask = full;
    loop {
        order.push(free[last]);
        let parent = parents[mask * m + last];
        mask &= !(1 << last);
        if parent == usize::MAX {
            break;
        }
        last = parent;
    }
    order.reverse();

    let path = problem.assemble_path(Some(start), &order);
    problem
        .route(path, SolveStrategy::DynamicProgramming)
        .ok_or(SolveError::Unsolvable)
}

/// Duration of the legs after the last free location: the pinned end if any,
/// then the return leg when the route closes back on its start.
fn closing_duration(
    problem: &OrderingProblem<'_>,
    start: LocationIdx,
    last: LocationIdx,
) -> Option<f64> {
    let mut duration = 0.0;
    let mut current = last;

    if let Some(end) = problem.fixed_end() {
        duration += problem.matrix.leg(current, end)?.duration_secs;
        current = end;
    }

    if problem.closes_loop() && current != start {
        duration += problem.matrix.leg(current, start)?.duration_secs;
    }

    Some(duration)
}
