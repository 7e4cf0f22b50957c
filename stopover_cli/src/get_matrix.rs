use clap::Args;
use comfy_table::Table;
use tracing::warn;

use stopover_matrix_providers::{
    geocoder::Geocoder,
    mapbox_api::{MapboxClient, MapboxClientParams, MapboxProfile},
    travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use stopover_optimizer::{
    matrix_report::MatrixReport,
    problem::location::Location,
};

use crate::parsers;

#[derive(Args)]
pub struct GetMatrixArgs {
    /// Locations to measure pairwise
    #[arg(required = true, num_args = 2..)]
    locations: Vec<String>,

    /// Travel profile
    #[arg(short, long, default_value = "driving", value_parser = parsers::parse_profile)]
    profile: MapboxProfile,

    /// Print the matrix report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: GetMatrixArgs) -> anyhow::Result<()> {
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
        anyhow::bail!("need at least 2 resolvable locations for a matrix");
    }

    let matrices = client
        .fetch_matrix(
            &locations,
            &TravelMatrixProvider::MapboxApi {
                profile: args.profile,
            },
        )
        .await?;

    let names: Vec<String> = locations
        .iter()
        .map(|location| location.name().to_owned())
        .collect();
    let report = MatrixReport::new(names, &matrices);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_grid(
        "travel times (minutes)",
        &report.locations,
        &report.durations_minutes,
    );
    print_grid(
        "distances (km)",
        &report.locations,
        &report.distances_km,
    );

    if let Some(summary) = &report.summary {
        println!(
            "averages over {} measured pairs: {:.1} min, {:.2} km",
            summary.total_pairs, summary.average_duration_minutes, summary.average_distance_km
        );
    }

    Ok(())
}

fn print_grid(title: &str, locations: &[String], cells: &[Vec<Option<f64>>]) {
    let mut table = Table::new();

    let mut header = vec![title.to_owned()];
    header.extend(locations.iter().cloned());
    table.set_header(header);

    for (from, row) in locations.iter().zip(cells) {
        let mut cols = vec![from.clone()];
        cols.extend(row.iter().map(|cell| match cell {
            Some(value) => format!("{value:.2}"),
            None => "N/A".to_owned(),
        }));
        table.add_row(cols);
    }

    println!("{table}");
}
