use clap::Args;
use tracing::warn;

use stopover_matrix_providers::{
    geocoder::Geocoder,
    mapbox_api::{MapboxClient, MapboxClientParams, MapboxProfile},
    travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use stopover_optimizer::{
    CancelToken,
    problem::{location::Location, location::LocationIdx, travel_cost_matrix::TravelCostMatrix},
    solver::{OrderingProblem, params::SolverParams, solve},
};

use crate::parsers;

#[derive(Args)]
pub struct TourArgs {
    /// Locations to visit; the tour starts and ends at the first one
    #[arg(required = true, num_args = 2..)]
    locations: Vec<String>,

    /// Travel profile
    #[arg(short, long, default_value = "driving", value_parser = parsers::parse_profile)]
    profile: MapboxProfile,

    /// End at the last visited location instead of returning to the start
    #[arg(long)]
    open: bool,
}

pub async fn run(args: TourArgs) -> anyhow::Result<()> {
    let geocoder = MapboxClient::new(MapboxClientParams::from_env()?);
    let client = TravelMatrixClient::from_env()?;

    let mut locations = Vec::with_capacity(args.locations.len());
    for name in &args.locations {
        match geocoder.resolve(name).await? {
            Some(point) => locations.push(Location::from_point(name.clone(), point)),
            None => warn!(%name, "could not geocode, leaving it out"),
        }
    }

    if locations.len() < 2 {
        anyhow::bail!("need at least 2 resolvable locations for a tour");
    }

    let matrices = client
        .fetch_matrix(
            &locations,
            &TravelMatrixProvider::MapboxApi {
                profile: args.profile,
            },
        )
        .await?;
    let matrix = TravelCostMatrix::from_travel_matrices(matrices, locations.len())?;

    let indices: Vec<LocationIdx> = (0..locations.len()).map(LocationIdx::new).collect();
    let problem = OrderingProblem {
        locations: &indices,
        start: Some(indices[0]),
        end: None,
        return_to_start: !args.open,
        matrix: &matrix,
    };

    let route = solve(&problem, &SolverParams::default(), &CancelToken::new())?;

    let path: Vec<&str> = route
        .path
        .iter()
        .map(|&idx| locations[idx].name())
        .collect();

    println!("{}", path.join(" -> "));
    println!(
        "{:.1} min / {:.2} km ({:?})",
        route.total_duration_secs / 60.0,
        route.total_distance_meters / 1000.0,
        route.strategy,
    );

    Ok(())
}
