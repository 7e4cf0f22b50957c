use std::cmp::Ordering;

use crate::{problem::location::LocationIdx, solver::Route};

/// One solved subset, as produced by driving the ordering solver once per
/// enumerated combination of optional stops.
#[derive(Debug, Clone)]
pub struct SolvedSubset {
    /// Position in the subset enumeration; the final tie-break, so ranking
    /// is a total order.
    pub enumeration_index: usize,
    pub stops: Vec<LocationIdx>,
    pub route: Route,
}

#[derive(Debug, Clone)]
pub struct RankedRoute {
    pub rank: usize,
    pub enumeration_index: usize,
    pub stops: Vec<LocationIdx>,
    pub route: Route,
    /// Signed deltas versus the zero-stop baseline; negative when a stop
    /// combination genuinely beats the direct route. Zero when this entry is
    /// the baseline or no baseline exists.
    pub extra_duration_secs: f64,
    pub extra_distance_meters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMetrics {
    pub duration_secs: f64,
    pub distance_meters: f64,
}

impl RouteMetrics {
    fn of(route: &Route) -> Self {
        Self {
            duration_secs: route.total_duration_secs,
            distance_meters: route.total_distance_meters,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    pub fastest: RouteMetrics,
    pub slowest: RouteMetrics,
    pub average_duration_secs: f64,
    pub average_distance_meters: f64,
    pub shortest_distance_meters: f64,
    pub longest_distance_meters: f64,
    pub direct: Option<RouteMetrics>,
    pub max_extra_duration_secs: Option<f64>,
    pub max_extra_distance_meters: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BestByStopCount {
    pub num_stops: usize,
    /// Rank of the cheapest entry with that stop count.
    pub rank: usize,
}

#[derive(Debug, Clone)]
pub struct Ranking {
    /// Sorted by duration ascending, ranks 1..=N with no gaps.
    pub entries: Vec<RankedRoute>,
    /// Index into `entries` of the zero-stop baseline, when it was solvable.
    pub baseline: Option<usize>,
    pub statistics: SummaryStatistics,
    pub best_by_stop_count: Vec<BestByStopCount>,
}

fn compare(a: &SolvedSubset, b: &SolvedSubset) -> Ordering {
    a.route
        .total_duration_secs
        .total_cmp(&b.route.total_duration_secs)
        .then(
            a.route
                .total_distance_meters
                .total_cmp(&b.route.total_distance_meters),
        )
        .then(a.stops.len().cmp(&b.stops.len()))
        .then(a.enumeration_index.cmp(&b.enumeration_index))
}

/// Pure aggregation over already-solved routes. `None` only when nothing was
/// solvable.
pub fn rank_routes(mut solved: Vec<SolvedSubset>) -> Option<Ranking> {
    if solved.is_empty() {
        return None;
    }

    solved.sort_by(compare);

    let baseline = solved.iter().position(|entry| entry.stops.is_empty());
    let direct = baseline.map(|index| RouteMetrics::of(&solved[index].route));

    let entries: Vec<RankedRoute> = solved
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let (extra_duration_secs, extra_distance_meters) = match &direct {
                Some(direct) => (
                    entry.route.total_duration_secs - direct.duration_secs,
                    entry.route.total_distance_meters - direct.distance_meters,
                ),
                None => (0.0, 0.0),
            };

            RankedRoute {
                rank: index + 1,
                enumeration_index: entry.enumeration_index,
                stops: entry.stops,
                route: entry.route,
                extra_duration_secs,
                extra_distance_meters,
            }
        })
        .collect();

    let statistics = summarize(&entries, direct);
    let best_by_stop_count = best_by_stop_count(&entries);

    Some(Ranking {
        entries,
        baseline,
        statistics,
        best_by_stop_count,
    })
}

fn summarize(entries: &[RankedRoute], direct: Option<RouteMetrics>) -> SummaryStatistics {
    let count = entries.len() as f64;
    let total_duration: f64 = entries
        .iter()
        .map(|entry| entry.route.total_duration_secs)
        .sum();
    let total_distance: f64 = entries
        .iter()
        .map(|entry| entry.route.total_distance_meters)
        .sum();

    let distances = entries.iter().map(|entry| entry.route.total_distance_meters);
    let shortest_distance_meters = distances.clone().fold(f64::INFINITY, f64::min);
    let longest_distance_meters = distances.fold(f64::NEG_INFINITY, f64::max);

    let max_duration = entries
        .iter()
        .map(|entry| entry.route.total_duration_secs)
        .fold(f64::NEG_INFINITY, f64::max);

    SummaryStatistics {
        fastest: RouteMetrics::of(&entries[0].route),
        slowest: RouteMetrics::of(&entries[entries.len() - 1].route),
        average_duration_secs: total_duration / count,
        average_distance_meters: total_distance / count,
        shortest_distance_meters,
        longest_distance_meters,
        direct,
        max_extra_duration_secs: direct.map(|d| max_duration - d.duration_secs),
        max_extra_distance_meters: direct.map(|d| longest_distance_meters - d.distance_meters),
    }
}

fn best_by_stop_count(entries: &[RankedRoute]) -> Vec<BestByStopCount> {
    let mut seen = std::collections::BTreeMap::new();

    // entries are sorted, so the first entry per stop count is its best
    for entry in entries {
        seen.entry(entry.stops.len()).or_insert(entry.rank);
    }

    seen.into_iter()
        .map(|(num_stops, rank)| BestByStopCount { num_stops, rank })
        .collect()
}
