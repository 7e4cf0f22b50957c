use std::collections::HashMap;

use stopover_matrix_providers::{
    cache::NoCache,
    geocoder::Geocoder,
    mapbox_api::MapboxClientParams,
    travel_matrices::TravelMatrices,
    travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use stopover_optimizer::{
    CancelToken,
    plan::{PlanError, PlanParams, PlanRequest, plan},
};

struct StaticGeocoder {
    points: HashMap<String, geo_types::Point>,
}

impl StaticGeocoder {
    fn new(names: &[&str]) -> Self {
        // coordinates only need to be distinct, the matrices are custom
        let points = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), geo_types::Point::new(i as f64, 0.0)))
            .collect();
        Self { points }
    }
}

impl Geocoder for StaticGeocoder {
    async fn resolve(&self, name: &str) -> anyhow::Result<Option<geo_types::Point>> {
        Ok(self.points.get(name).copied())
    }
}

struct PanickingGeocoder;

impl Geocoder for PanickingGeocoder {
    async fn resolve(&self, _name: &str) -> anyhow::Result<Option<geo_types::Point>> {
        panic!("geocoding must not run when capacity checks fail");
    }
}

fn offline_client() -> TravelMatrixClient<NoCache> {
    TravelMatrixClient::new(
        MapboxClientParams {
            access_token: String::new(),
        },
        NoCache,
    )
}

/// Symmetric minute matrix over [A, B, C, D] as seconds/meters:
/// A-B 10, A-C 12, A-D 25, B-C 5, B-D 15, C-D 10.
fn four_city_provider() -> TravelMatrixProvider {
    let minutes = [
        [0.0, 10.0, 12.0, 25.0],
        [10.0, 0.0, 5.0, 15.0],
        [12.0, 5.0, 0.0, 10.0],
        [25.0, 15.0, 10.0, 0.0],
    ];

    let durations = minutes
        .iter()
        .flatten()
        .map(|&m| Some(m * 60.0))
        .collect();
    let distances = minutes
        .iter()
        .flatten()
        .map(|&m| Some(m * 1000.0))
        .collect();

    TravelMatrixProvider::Custom {
        matrices: TravelMatrices {
            durations,
            distances,
        },
    }
}

fn four_city_request() -> PlanRequest {
    PlanRequest {
        origin: "A".into(),
        destination: "D".into(),
        optional_stops: vec!["B".into(), "C".into()],
        provider: four_city_provider(),
    }
}

#[tokio::test]
async fn end_to_end_ranking_over_two_optional_stops() {
    let geocoder = StaticGeocoder::new(&["A", "B", "C", "D"]);
    let client = offline_client();

    let report = plan(
        four_city_request(),
        &PlanParams::default(),
        &geocoder,
        &client,
        &CancelToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.total_combinations, 4);
    assert_eq!(report.route_rankings.len(), 4);
    assert!(report.unresolved_locations.is_empty());
    assert!(report.unsolvable_combinations.is_empty());

    // The single stop C beats the direct route: 12 + 10 = 22 < 25 minutes.
    let best = &report.route_rankings[0];
    assert_eq!(best.rank, 1);
    assert_eq!(best.path, vec!["A", "C", "D"]);
    assert_eq!(best.total_duration_minutes, 22.0);
    assert_eq!(best.total_distance_km, 22.0);
    assert_eq!(best.num_stops, 1);
    assert_eq!(best.extra_duration_minutes, -3.0);
    assert_eq!(best.extra_distance_km, -3.0);

    // Three routes tie at 25 minutes / 25 km; fewer stops ranks first.
    let ranks: Vec<(usize, usize, f64)> = report
        .route_rankings
        .iter()
        .map(|r| (r.rank, r.num_stops, r.total_duration_minutes))
        .collect();
    assert_eq!(
        ranks,
        vec![(1, 1, 22.0), (2, 0, 25.0), (3, 1, 25.0), (4, 2, 25.0)]
    );

    // Direct baseline reports zero extras.
    let direct = &report.route_rankings[1];
    assert_eq!(direct.path, vec!["A", "D"]);
    assert_eq!(direct.extra_duration_minutes, 0.0);
    assert_eq!(direct.extra_distance_km, 0.0);

    let stats = &report.summary_stats;
    assert_eq!(stats.fastest_route.duration_minutes, 22.0);
    assert_eq!(stats.slowest_route.duration_minutes, 25.0);
    assert_eq!(stats.average_duration_minutes, 24.3);
    assert_eq!(stats.average_distance_km, 24.25);
    assert_eq!(stats.shortest_route_km, 22.0);
    assert_eq!(stats.longest_route_km, 25.0);
    assert_eq!(stats.direct_route.unwrap().duration_minutes, 25.0);
    assert_eq!(stats.max_extra_time_minutes, Some(0.0));
    assert_eq!(stats.max_extra_distance_km, Some(0.0));
}

#[tokio::test]
async fn capacity_check_fires_before_any_geocoding() {
    let client = offline_client();
    let request = PlanRequest {
        origin: "A".into(),
        destination: "Z".into(),
        optional_stops: (0..11).map(|i| format!("stop {i}")).collect(),
        provider: four_city_provider(),
    };

    let err = plan(
        request,
        &PlanParams::default(),
        &PanickingGeocoder,
        &client,
        &CancelToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PlanError::CapacityExceeded {
            count: 11,
            cap: 10,
            ..
        }
    ));
}

#[tokio::test]
async fn unsolvable_combination_is_dropped_not_fatal() {
    // B -> D and D -> B are unmeasured, so the {B} combination has no valid
    // ordering while the direct route still solves.
    let minutes: [[Option<f64>; 3]; 3] = [
        [Some(0.0), Some(10.0), Some(25.0)],
        [Some(10.0), Some(0.0), None],
        [Some(25.0), None, Some(0.0)],
    ];
    let durations: Vec<Option<f64>> = minutes
        .iter()
        .flatten()
        .map(|m| m.map(|v| v * 60.0))
        .collect();
    let distances: Vec<Option<f64>> = minutes
        .iter()
        .flatten()
        .map(|m| m.map(|v| v * 1000.0))
        .collect();

    let request = PlanRequest {
        origin: "A".into(),
        destination: "D".into(),
        optional_stops: vec!["B".into()],
        provider: TravelMatrixProvider::Custom {
            matrices: TravelMatrices {
                durations,
                distances,
            },
        },
    };

    let geocoder = StaticGeocoder::new(&["A", "B", "D"]);
    let client = offline_client();

    let report = plan(
        request,
        &PlanParams::default(),
        &geocoder,
        &client,
        &CancelToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.total_combinations, 2);
    assert_eq!(report.route_rankings.len(), 1);
    assert_eq!(report.route_rankings[0].path, vec!["A", "D"]);
    assert_eq!(report.unsolvable_combinations, vec![vec!["B".to_string()]]);
}

#[tokio::test]
async fn every_combination_unsolvable_is_fatal() {
    // No measured leg reaches D, so the direct route and the {B} detour
    // both fail and nothing is left to rank.
    let minutes: [[Option<f64>; 3]; 3] = [
        [Some(0.0), Some(10.0), None],
        [Some(10.0), Some(0.0), None],
        [None, None, Some(0.0)],
    ];
    let durations: Vec<Option<f64>> = minutes
        .iter()
        .flatten()
        .map(|m| m.map(|v| v * 60.0))
        .collect();
    let distances: Vec<Option<f64>> = minutes
        .iter()
        .flatten()
        .map(|m| m.map(|v| v * 1000.0))
        .collect();

    let request = PlanRequest {
        origin: "A".into(),
        destination: "D".into(),
        optional_stops: vec!["B".into()],
        provider: TravelMatrixProvider::Custom {
            matrices: TravelMatrices {
                durations,
                distances,
            },
        },
    };

    let geocoder = StaticGeocoder::new(&["A", "B", "D"]);
    let client = offline_client();

    let err = plan(
        request,
        &PlanParams::default(),
        &geocoder,
        &client,
        &CancelToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PlanError::NoSolvableRoutes));
}

#[tokio::test]
async fn unresolved_stop_is_recorded_and_left_out() {
    // Matrix covers A, B, D only; "Nowhere" fails to geocode.
    let geocoder = StaticGeocoder::new(&["A", "B", "D"]);
    let client = offline_client();

    let minutes = [
        [0.0, 10.0, 25.0],
        [10.0, 0.0, 15.0],
        [25.0, 15.0, 0.0],
    ];
    let request = PlanRequest {
        origin: "A".into(),
        destination: "D".into(),
        optional_stops: vec!["B".into(), "Nowhere".into()],
        provider: TravelMatrixProvider::Custom {
            matrices: TravelMatrices {
                durations: minutes.iter().flatten().map(|&m| Some(m * 60.0)).collect(),
                distances: minutes.iter().flatten().map(|&m| Some(m * 1000.0)).collect(),
            },
        },
    };

    let report = plan(
        request,
        &PlanParams::default(),
        &geocoder,
        &client,
        &CancelToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.unresolved_locations, vec!["Nowhere".to_string()]);
    assert_eq!(report.optional_stops, vec!["B".to_string()]);
    assert_eq!(report.total_combinations, 2);
}

#[tokio::test]
async fn missing_origin_is_fatal() {
    let geocoder = StaticGeocoder::new(&["B", "D"]);
    let client = offline_client();

    let err = plan(
        four_city_request(),
        &PlanParams::default(),
        &geocoder,
        &client,
        &CancelToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PlanError::OriginNotFound(name) if name == "A"));
}

#[tokio::test]
async fn cancelled_request_returns_cancelled() {
    let geocoder = StaticGeocoder::new(&["A", "B", "C", "D"]);
    let client = offline_client();

    let cancel = CancelToken::new();
    cancel.cancel();

    let err = plan(
        four_city_request(),
        &PlanParams::default(),
        &geocoder,
        &client,
        &cancel,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PlanError::Cancelled));
}
