use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    problem::location::Location,
    ranking::{RankedRoute, Ranking, RouteMetrics},
    solver::SolveStrategy,
};

/// Rounding applied at the report boundary only; everything upstream works
/// in raw seconds and meters.
pub(crate) fn round_minutes(secs: f64) -> f64 {
    (secs / 60.0 * 10.0).round() / 10.0
}

pub(crate) fn round_km(meters: f64) -> f64 {
    (meters / 1000.0 * 100.0).round() / 100.0
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(rename = "RankedRoute")]
pub struct JsonRankedRoute {
    pub rank: usize,
    pub path: Vec<String>,
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
    pub num_stops: usize,
    pub stops_included: Vec<String>,
    /// Signed: negative when this combination beats the direct route.
    pub extra_distance_km: f64,
    pub extra_duration_minutes: f64,
    pub strategy: SolveStrategy,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy)]
#[serde(rename = "RouteMetrics")]
pub struct JsonRouteMetrics {
    pub duration_minutes: f64,
    pub distance_km: f64,
}

impl From<RouteMetrics> for JsonRouteMetrics {
    fn from(metrics: RouteMetrics) -> Self {
        Self {
            duration_minutes: round_minutes(metrics.duration_secs),
            distance_km: round_km(metrics.distance_meters),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(rename = "SummaryStats")]
pub struct JsonSummaryStats {
    pub fastest_route: JsonRouteMetrics,
    pub slowest_route: JsonRouteMetrics,
    pub average_duration_minutes: f64,
    pub average_distance_km: f64,
    pub shortest_route_km: f64,
    pub longest_route_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_route: Option<JsonRouteMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_extra_time_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_extra_distance_km: Option<f64>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(rename = "BestByStopCount")]
pub struct JsonBestByStopCount {
    pub num_stops: usize,
    pub rank: usize,
}

/// The full optimization result, ready for rendering or export. The engine
/// owns no output format beyond this structure.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(rename = "Report")]
pub struct Report {
    pub origin: String,
    pub destination: String,
    pub optional_stops: Vec<String>,
    /// 2^K for the K optional stops that geocoded.
    pub total_combinations: usize,
    pub route_rankings: Vec<JsonRankedRoute>,
    pub summary_stats: JsonSummaryStats,
    pub best_by_stop_count: Vec<JsonBestByStopCount>,
    /// Names that failed to geocode and were left out.
    pub unresolved_locations: Vec<String>,
    /// Stop combinations with no valid ordering, dropped from the rankings.
    pub unsolvable_combinations: Vec<Vec<String>>,
}

fn json_entry(entry: &RankedRoute, locations: &[Location]) -> JsonRankedRoute {
    JsonRankedRoute {
        rank: entry.rank,
        path: entry
            .route
            .path
            .iter()
            .map(|&idx| locations[idx].name().to_owned())
            .collect(),
        total_distance_km: round_km(entry.route.total_distance_meters),
        total_duration_minutes: round_minutes(entry.route.total_duration_secs),
        num_stops: entry.stops.len(),
        stops_included: entry
            .stops
            .iter()
            .map(|&idx| locations[idx].name().to_owned())
            .collect(),
        extra_distance_km: round_km(entry.extra_distance_meters),
        extra_duration_minutes: round_minutes(entry.extra_duration_secs),
        strategy: entry.route.strategy,
    }
}

impl Report {
    pub(crate) fn build(
        origin: String,
        destination: String,
        optional_stops: Vec<String>,
        total_combinations: usize,
        ranking: &Ranking,
        locations: &[Location],
        unresolved_locations: Vec<String>,
        unsolvable_combinations: Vec<Vec<String>>,
    ) -> Self {
        let route_rankings = ranking
            .entries
            .iter()
            .map(|entry| json_entry(entry, locations))
            .collect();

        let statistics = &ranking.statistics;
        let summary_stats = JsonSummaryStats {
            fastest_route: statistics.fastest.into(),
            slowest_route: statistics.slowest.into(),
            average_duration_minutes: round_minutes(statistics.average_duration_secs),
            average_distance_km: round_km(statistics.average_distance_meters),
            shortest_route_km: round_km(statistics.shortest_distance_meters),
            longest_route_km: round_km(statistics.longest_distance_meters),
            direct_route: statistics.direct.map(Into::into),
            max_extra_time_minutes: statistics.max_extra_duration_secs.map(round_minutes),
            max_extra_distance_km: statistics.max_extra_distance_meters.map(round_km),
        };

        let best_by_stop_count = ranking
            .best_by_stop_count
            .iter()
            .map(|best| JsonBestByStopCount {
                num_stops: best.num_stops,
                rank: best.rank,
            })
            .collect();

        Report {
            origin,
            destination,
            optional_stops,
            total_combinations,
            route_rankings,
            summary_stats,
            best_by_stop_count,
            unresolved_locations,
            unsolvable_combinations,
        }
    }
}
