use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use stopover_matrix_providers::{
    cache::MatricesCache, geocoder::Geocoder, travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};

use crate::{
    problem::{
        location::{Location, LocationIdx},
        travel_cost_matrix::TravelCostMatrix,
    },
    ranking::{SolvedSubset, rank_routes},
    report::Report,
    solver::{OrderingProblem, Route, SolveError, params::SolverParams, solve},
    subsets::enumerate_subsets,
    utils::cancel::CancelToken,
};

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub origin: String,
    pub destination: String,
    pub optional_stops: Vec<String>,
    pub provider: TravelMatrixProvider,
}

#[derive(Debug, Clone, Copy)]
pub struct PlanParams {
    /// Cap on optional stops; 2^K subsets are solved, so this bounds the
    /// whole request.
    pub max_optional_stops: usize,
    /// Provider-side cap on coordinates per matrix call.
    pub max_matrix_locations: usize,
    pub solver: SolverParams,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            max_optional_stops: 10,
            max_matrix_locations: stopover_matrix_providers::mapbox_api::MAPBOX_MAX_COORDINATES,
            solver: SolverParams::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("too many {subject}: {count} exceeds the cap of {cap}")]
    CapacityExceeded {
        subject: &'static str,
        count: usize,
        cap: usize,
    },

    #[error("could not geocode the origin '{0}'")]
    OriginNotFound(String),

    #[error("could not geocode the destination '{0}'")]
    DestinationNotFound(String),

    #[error("geocoding '{name}' failed: {source}")]
    Geocoding {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "matrix fetch failed: {0}; check MAPBOX_ACCESS_TOKEN and network access, or retry later"
    )]
    Provider(#[source] anyhow::Error),

    #[error("no stop combination had a solvable route")]
    NoSolvableRoutes,

    #[error("optimization cancelled")]
    Cancelled,
}

/// One optimization request, start to finish: capacity pre-flight, geocode,
/// a single matrix fetch covering every location any subset can use, one
/// solve per subset on the rayon pool, then ranking.
///
/// Pure with respect to its inputs; all state lives in the request and the
/// returned report.
pub async fn plan<G, C>(
    request: PlanRequest,
    params: &PlanParams,
    geocoder: &G,
    matrix_client: &TravelMatrixClient<C>,
    cancel: &CancelToken,
) -> Result<Report, PlanError>
where
    G: Geocoder,
    C: MatricesCache,
{
    // Fail before any external call: the caps bound both the number of
    // subset solves and the provider's per-call coordinate limit.
    if request.optional_stops.len() > params.max_optional_stops {
        return Err(PlanError::CapacityExceeded {
            subject: "optional stops",
            count: request.optional_stops.len(),
            cap: params.max_optional_stops,
        });
    }

    let total_locations = request.optional_stops.len() + 2;
    if total_locations > params.max_matrix_locations {
        return Err(PlanError::CapacityExceeded {
            subject: "matrix locations",
            count: total_locations,
            cap: params.max_matrix_locations,
        });
    }

    let (locations, stop_names, unresolved) = resolve_locations(&request, geocoder).await?;

    if cancel.is_cancelled() {
        return Err(PlanError::Cancelled);
    }

    info!(
        locations = locations.len(),
        unresolved = unresolved.len(),
        "fetching travel matrix"
    );

    let matrices = matrix_client
        .fetch_matrix(&locations, &request.provider)
        .await
        .map_err(PlanError::Provider)?;

    let matrix = TravelCostMatrix::from_travel_matrices(matrices, locations.len())
        .map_err(PlanError::Provider)?;

    let num_stops = locations.len() - 2;
    let subsets = enumerate_subsets(num_stops, params.max_optional_stops).map_err(|_| {
        PlanError::CapacityExceeded {
            subject: "optional stops",
            count: num_stops,
            cap: params.max_optional_stops,
        }
    })?;
    let total_combinations = subsets.len();

    info!(
        combinations = total_combinations,
        "solving all stop combinations"
    );

    let origin_idx = LocationIdx::new(0);
    let destination_idx = LocationIdx::new(locations.len() - 1);

    let results: Vec<(usize, Vec<LocationIdx>, Result<Route, SolveError>)> = subsets
        .par_iter()
        .enumerate()
        .map(|(enumeration_index, subset)| {
            // Stop i sits at matrix row i + 1, between origin and destination.
            let stops: Vec<LocationIdx> = subset
                .iter()
                .map(|&stop| LocationIdx::new(stop + 1))
                .collect();

            let mut subset_locations = Vec::with_capacity(stops.len() + 2);
            subset_locations.push(origin_idx);
            subset_locations.extend_from_slice(&stops);
            subset_locations.push(destination_idx);

            let problem = OrderingProblem {
                locations: &subset_locations,
                start: Some(origin_idx),
                end: Some(destination_idx),
                return_to_start: false,
                matrix: &matrix,
            };

            let result = solve(&problem, &params.solver, cancel);
            (enumeration_index, stops, result)
        })
        .collect();

    let mut solved = Vec::with_capacity(results.len());
    let mut unsolvable_combinations = Vec::new();

    for (enumeration_index, stops, result) in results {
        match result {
            Ok(route) => solved.push(SolvedSubset {
                enumeration_index,
                stops,
                route,
            }),
            Err(SolveError::Cancelled) => return Err(PlanError::Cancelled),
            Err(err) => {
                let names: Vec<String> = stops
                    .iter()
                    .map(|&idx| locations[idx].name().to_owned())
                    .collect();
                debug!(stops = ?names, %err, "dropping unsolvable combination");
                unsolvable_combinations.push(names);
            }
        }
    }

    let ranking = rank_routes(solved).ok_or(PlanError::NoSolvableRoutes)?;

    Ok(Report::build(
        request.origin,
        request.destination,
        stop_names,
        total_combinations,
        &ranking,
        &locations,
        unresolved,
        unsolvable_combinations,
    ))
}

/// Geocode origin, destination and stops. Endpoint misses are fatal; stop
/// misses are recorded and the stop is left out. Duplicate names are the
/// same location, so repeated stops collapse into the first occurrence.
async fn resolve_locations<G>(
    request: &PlanRequest,
    geocoder: &G,
) -> Result<(Vec<Location>, Vec<String>, Vec<String>), PlanError>
where
    G: Geocoder,
{
    let origin_point = geocoder
        .resolve(&request.origin)
        .await
        .map_err(|source| PlanError::Geocoding {
            name: request.origin.clone(),
            source,
        })?
        .ok_or_else(|| PlanError::OriginNotFound(request.origin.clone()))?;

    let destination_point = geocoder
        .resolve(&request.destination)
        .await
        .map_err(|source| PlanError::Geocoding {
            name: request.destination.clone(),
            source,
        })?
        .ok_or_else(|| PlanError::DestinationNotFound(request.destination.clone()))?;

    let mut stops: Vec<Location> = Vec::with_capacity(request.optional_stops.len());
    let mut unresolved = Vec::new();

    for name in &request.optional_stops {
        if name == &request.origin
            || name == &request.destination
            || stops.iter().any(|stop| stop.name() == name)
        {
            debug!(%name, "duplicate location name, treated as the same stop");
            continue;
        }

        match geocoder.resolve(name).await {
            Ok(Some(point)) => stops.push(Location::from_point(name.clone(), point)),
            Ok(None) => {
                warn!(%name, "could not geocode optional stop, leaving it out");
                unresolved.push(name.clone());
            }
            Err(err) => {
                warn!(%name, %err, "geocoding optional stop failed, leaving it out");
                unresolved.push(name.clone());
            }
        }
    }

    let stop_names = stops.iter().map(|stop| stop.name().to_owned()).collect();

    let mut locations = Vec::with_capacity(stops.len() + 2);
    locations.push(Location::from_point(request.origin.clone(), origin_point));
    locations.extend(stops);
    locations.push(Location::from_point(
        request.destination.clone(),
        destination_point,
    ));

    Ok((locations, stop_names, unresolved))
}
