use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    problem::{location::LocationIdx, travel_cost_matrix::TravelCostMatrix},
    solver::params::SolverParams,
    utils::cancel::CancelToken,
};

mod brute_force;
mod held_karp;
mod nearest_neighbor;
pub mod params;

/// Which strategy produced a route. Exact strategies guarantee the optimum;
/// the heuristic only guarantees termination, so correctness-sensitive
/// callers can filter on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SolveStrategy {
    BruteForce,
    DynamicProgramming,
    NearestNeighbor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Vec<LocationIdx>,
    pub total_duration_secs: f64,
    pub total_distance_meters: f64,
    pub strategy: SolveStrategy,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("need at least 2 locations to order, got {0}")]
    TooFewLocations(usize),

    #[error("start location is not one of the problem locations")]
    StartNotInLocations,

    #[error("end location is not one of the problem locations")]
    EndNotInLocations,

    #[error("no ordering with measured travel costs exists")]
    Unsolvable,

    #[error("solve cancelled")]
    Cancelled,
}

/// One ordering problem over a slice of the request's locations. The matrix
/// is the request-wide one; `locations` selects the rows that participate.
///
/// An `end` equal to the `start` means the route closes back on its start,
/// the same as setting `return_to_start`; it never produces a separate
/// pinned leg.
pub struct OrderingProblem<'a> {
    pub locations: &'a [LocationIdx],
    pub start: Option<LocationIdx>,
    pub end: Option<LocationIdx>,
    pub return_to_start: bool,
    pub matrix: &'a TravelCostMatrix,
}

impl OrderingProblem<'_> {
    /// The fixed final stop, when one is pinned. An end equal to the start
    /// closes the loop instead of adding a separate leg.
    fn fixed_end(&self) -> Option<LocationIdx> {
        self.end.filter(|end| Some(*end) != self.start)
    }

    /// Whether the route must come back to its start, requested explicitly
    /// or by pinning the end to the start location.
    fn closes_loop(&self) -> bool {
        self.return_to_start || (self.start.is_some() && self.end == self.start)
    }

    /// Locations the solver is free to reorder: everything that is not
    /// pinned as start or end. With no fixed start every location is free
    /// and the solver searches over start choices too.
    fn free_locations(&self) -> Vec<LocationIdx> {
        let fixed_end = self.fixed_end();
        self.locations
            .iter()
            .copied()
            .filter(|idx| Some(*idx) != self.start && Some(*idx) != fixed_end)
            .collect()
    }

    fn assemble_path(&self, start: Option<LocationIdx>, order: &[LocationIdx]) -> Vec<LocationIdx> {
        let mut path = Vec::with_capacity(order.len() + 3);
        if let Some(start) = start {
            path.push(start);
        }
        path.extend_from_slice(order);
        if let Some(end) = self.fixed_end() {
            path.push(end);
        }
        if self.closes_loop()
            && let Some(first) = path.first().copied()
            && path.last() != Some(&first)
        {
            path.push(first);
        }
        path
    }

    /// Totals for a full candidate path. `None` when any consecutive pair is
    /// unmeasured, which invalidates the whole candidate.
    fn evaluate_path(&self, path: &[LocationIdx]) -> Option<(f64, f64)> {
        let mut total_duration_secs = 0.0;
        let mut total_distance_meters = 0.0;

        for pair in path.windows(2) {
            let leg = self.matrix.leg(pair[0], pair[1])?;
            total_duration_secs += leg.duration_secs;
            total_distance_meters += leg.distance_meters;
        }

        Some((total_duration_secs, total_distance_meters))
    }

    fn route(&self, path: Vec<LocationIdx>, strategy: SolveStrategy) -> Option<Route> {
        let (total_duration_secs, total_distance_meters) = self.evaluate_path(&path)?;

        Some(Route {
            path,
            total_duration_secs,
            total_distance_meters,
            strategy,
        })
    }
}

/// Minimal-duration visiting order for the problem. Strategy is picked from
/// the free location count M: exact brute force for small M, exact Held-Karp
/// DP for medium M, nearest-neighbor heuristic beyond that.
pub fn solve(
    problem: &OrderingProblem<'_>,
    params: &SolverParams,
    cancel: &CancelToken,
) -> Result<Route, SolveError> {
    if problem.locations.len() < 2 {
        return Err(SolveError::TooFewLocations(problem.locations.len()));
    }

    if let Some(start) = problem.start
        && !problem.locations.contains(&start)
    {
        return Err(SolveError::StartNotInLocations);
    }

    if let Some(end) = problem.end
        && !problem.locations.contains(&end)
    {
        return Err(SolveError::EndNotInLocations);
    }

    let free = problem.free_locations();

    let route = if free.len() <= params.exact_threshold {
        debug!(
            free = free.len(),
            "ordering solver: exhaustive permutation search"
        );
        brute_force::solve(problem, &free, cancel)?
    } else if free.len() <= params.dp_threshold {
        debug!(free = free.len(), "ordering solver: Held-Karp DP");
        held_karp::solve(problem, &free, cancel)?
    } else {
        debug!(
            free = free.len(),
            "ordering solver: nearest-neighbor heuristic"
        );
        nearest_neighbor::solve(problem, &free, cancel)?
    };

    Ok(route)
}
