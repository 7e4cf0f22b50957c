use crate::{
    problem::location::LocationIdx,
    solver::{OrderingProblem, Route, SolveError, SolveStrategy},
    utils::cancel::CancelToken,
};

/// Exhaustive permutation search over the free locations. Exact; O(M!).
/// Candidates with an unmeasured pair are skipped, and on equal duration the
/// first permutation in enumeration order wins.
pub(super) fn solve(
    problem: &OrderingProblem<'_>,
    free: &[LocationIdx],
    cancel: &CancelToken,
) -> Result<Route, SolveError> {
    let mut best: Option<Route> = None;
    let mut order = Vec::with_capacity(free.len());
    let mut used = vec![false; free.len()];

    permute(problem, free, cancel, &mut order, &mut used, &mut best)?;

    best.ok_or(SolveError::Unsolvable)
}

fn permute(
    problem: &OrderingProblem<'_>,
    free: &[LocationIdx],
    cancel: &CancelToken,
    order: &mut Vec<LocationIdx>,
    used: &mut [bool],
    best: &mut Option<Route>,
) -> Result<(), SolveError> {
    if cancel.is_cancelled() {
        return Err(SolveError::Cancelled);
    }

    if order.len() == free.len() {
        // With no pinned start the permutation's head is the start candidate.
        let path = problem.assemble_path(problem.start, order);

        if let Some(route) = problem.route(path, SolveStrategy::BruteForce)
            && !best
                .as_ref()
                .is_some_and(|b| b.total_duration_secs <= route.total_duration_secs)
        {
            *best = Some(route);
        }

        return Ok(());
    }

    for index in 0..free.len() {
        if used[index] {
            continue;
        }

        used[index] = true;
        order.push(free[index]);
        permute(problem, free, cancel, order, used, best)?;
        order.pop();
        used[index] = false;
    }

    Ok(())
}
