use std::time::Duration;

use clap::Args;
use comfy_table::Table;
use indicatif::ProgressBar;
use tracing::info;

use stopover_matrix_providers::{
    mapbox_api::{MapboxClient, MapboxClientParams, MapboxProfile},
    travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use stopover_optimizer::{
    CancelToken,
    plan::{PlanParams, PlanRequest, plan},
    report::Report,
};

use crate::parsers;

#[derive(Args)]
pub struct OptimizeArgs {
    /// Start of the route
    #[arg(short, long)]
    origin: String,

    /// End of the route
    #[arg(short, long)]
    destination: String,

    /// Optional stop to consider (repeat for several)
    #[arg(short, long = "stop")]
    stops: Vec<String>,

    /// Travel profile
    #[arg(short, long, default_value = "driving", value_parser = parsers::parse_profile)]
    profile: MapboxProfile,

    /// Use straight-line matrices at this speed instead of the Matrix API
    #[arg(long, value_name = "KMH")]
    crow_flies: Option<f64>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let provider = match args.crow_flies {
        Some(speed_kmh) => TravelMatrixProvider::AsTheCrowFlies { speed_kmh },
        None => TravelMatrixProvider::MapboxApi {
            profile: args.profile,
        },
    };

    let geocoder = MapboxClient::new(MapboxClientParams::from_env()?);
    let client = TravelMatrixClient::from_env()?;

    let request = PlanRequest {
        origin: args.origin,
        destination: args.destination,
        optional_stops: args.stops,
        provider,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("solving stop combinations...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = plan(
        request,
        &PlanParams::default(),
        &geocoder,
        &client,
        &CancelToken::new(),
    )
    .await?;

    spinner.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Route",
        "Duration (min)",
        "Distance (km)",
        "Stops",
        "Extra (min)",
        "Strategy",
    ]);

    for entry in &report.route_rankings {
        table.add_row(vec![
            entry.rank.to_string(),
            entry.path.join(" -> "),
            format!("{:.1}", entry.total_duration_minutes),
            format!("{:.2}", entry.total_distance_km),
            entry.num_stops.to_string(),
            format!("{:+.1}", entry.extra_duration_minutes),
            format!("{:?}", entry.strategy),
        ]);
    }

    println!("{table}");

    let stats = &report.summary_stats;
    println!(
        "{} of {} combinations solvable; fastest {:.1} min / {:.2} km, slowest {:.1} min",
        report.route_rankings.len(),
        report.total_combinations,
        stats.fastest_route.duration_minutes,
        stats.fastest_route.distance_km,
        stats.slowest_route.duration_minutes,
    );

    if let Some(direct) = &stats.direct_route {
        println!(
            "direct route: {:.1} min / {:.2} km",
            direct.duration_minutes, direct.distance_km
        );
    }

    if !report.unresolved_locations.is_empty() {
        info!(
            "could not geocode: {}",
            report.unresolved_locations.join(", ")
        );
    }

    for combination in &report.unsolvable_combinations {
        info!("no valid route with stops: {}", combination.join(", "));
    }
}
