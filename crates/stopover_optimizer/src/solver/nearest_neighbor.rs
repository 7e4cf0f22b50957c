use crate::{
    problem::location::LocationIdx,
    solver::{OrderingProblem, Route, SolveError, SolveStrategy},
    utils::cancel::CancelToken,
};

/// Greedy construction: from the current location, always move to the
/// unvisited free location with the smallest measured duration, ties going
/// to the earliest location in input order. Polynomial but not optimal.
pub(super) fn solve(
    problem: &OrderingProblem<'_>,
    free: &[LocationIdx],
    cancel: &CancelToken,
) -> Result<Route, SolveError> {
    let (start, mut unvisited) = match problem.start {
        Some(start) => (start, free.to_vec()),
        None => {
            let Some((&first, rest)) = free.split_first() else {
                return Err(SolveError::Unsolvable);
            };
            (first, rest.to_vec())
        }
    };

    let mut order = Vec::with_capacity(unvisited.len());
    let mut current = start;

    while !unvisited.is_empty() {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }

        let mut nearest: Option<(usize, f64)> = None;
        for (index, &candidate) in unvisited.iter().enumerate() {
            if let Some(duration) = problem.matrix.duration_secs(current, candidate)
                && !nearest.is_some_and(|(_, best)| best <= duration)
            {
                nearest = Some((index, duration));
            }
        }

        // Every remaining leg from here is unmeasured
        let Some((index, _)) = nearest else {
            return Err(SolveError::Unsolvable);
        };

        current = unvisited.remove(index);
        order.push(current);
    }

    let start = match problem.start {
        Some(_) => Some(start),
        None => {
            // The chosen start came from the free list, put it back in front.
            order.insert(0, start);
            None
        }
    };

    let path = problem.assemble_path(start, &order);
    problem
        .route(path, SolveStrategy::NearestNeighbor)
        .ok_or(SolveError::Unsolvable)
}
