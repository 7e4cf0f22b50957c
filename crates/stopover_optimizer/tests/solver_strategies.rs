use rand::{Rng, SeedableRng, rngs::StdRng};

use stopover_optimizer::{
    CancelToken,
    problem::{location::LocationIdx, travel_cost_matrix::TravelCostMatrix},
    solver::{OrderingProblem, SolveStrategy, params::SolverParams, solve},
};

fn random_matrix(rng: &mut StdRng, n: usize) -> TravelCostMatrix {
    let durations: Vec<Vec<Option<f64>>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        Some(0.0)
                    } else {
                        Some(rng.random_range(60.0..3600.0))
                    }
                })
                .collect()
        })
        .collect();

    let distances: Vec<Vec<Option<f64>>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        Some(0.0)
                    } else {
                        Some(rng.random_range(500.0..50_000.0))
                    }
                })
                .collect()
        })
        .collect();

    TravelCostMatrix::from_rows(durations, distances)
}

const BRUTE_ONLY: SolverParams = SolverParams {
    exact_threshold: 16,
    dp_threshold: 16,
};
const DP_ONLY: SolverParams = SolverParams {
    exact_threshold: 0,
    dp_threshold: 16,
};
const HEURISTIC_ONLY: SolverParams = SolverParams {
    exact_threshold: 0,
    dp_threshold: 0,
};

fn solve_variants(
    matrix: &TravelCostMatrix,
    locations: &[LocationIdx],
    start: Option<LocationIdx>,
    end: Option<LocationIdx>,
    return_to_start: bool,
) -> (f64, f64, f64) {
    let cancel = CancelToken::new();
    let problem = OrderingProblem {
        locations,
        start,
        end,
        return_to_start,
        matrix,
    };

    let brute = solve(&problem, &BRUTE_ONLY, &cancel).unwrap();
    let dp = solve(&problem, &DP_ONLY, &cancel).unwrap();
    let heuristic = solve(&problem, &HEURISTIC_ONLY, &cancel).unwrap();

    assert_eq!(brute.strategy, SolveStrategy::BruteForce);
    assert_eq!(dp.strategy, SolveStrategy::DynamicProgramming);
    assert_eq!(heuristic.strategy, SolveStrategy::NearestNeighbor);

    (
        brute.total_duration_secs,
        dp.total_duration_secs,
        heuristic.total_duration_secs,
    )
}

#[test]
fn brute_force_and_dp_agree_on_point_to_point_instances() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..25 {
        let n = rng.random_range(4..8);
        let matrix = random_matrix(&mut rng, n);
        let locations: Vec<LocationIdx> = (0..n).map(LocationIdx::new).collect();

        let (brute, dp, heuristic) = solve_variants(
            &matrix,
            &locations,
            Some(LocationIdx::new(0)),
            Some(LocationIdx::new(n - 1)),
            false,
        );

        assert!((brute - dp).abs() < 1e-9, "brute {brute} vs dp {dp}");
        assert!(
            heuristic >= brute - 1e-9,
            "heuristic {heuristic} beat the optimum {brute}"
        );
    }
}

#[test]
fn brute_force_and_dp_agree_on_round_trips() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..25 {
        let n = rng.random_range(4..8);
        let matrix = random_matrix(&mut rng, n);
        let locations: Vec<LocationIdx> = (0..n).map(LocationIdx::new).collect();

        let (brute, dp, heuristic) =
            solve_variants(&matrix, &locations, Some(LocationIdx::new(0)), None, true);

        assert!((brute - dp).abs() < 1e-9, "brute {brute} vs dp {dp}");
        assert!(heuristic >= brute - 1e-9);
    }
}

#[test]
fn brute_force_and_dp_agree_with_free_start() {
    let mut rng = StdRng::seed_from_u64(13);

    for _ in 0..25 {
        let n = rng.random_range(3..7);
        let matrix = random_matrix(&mut rng, n);
        let locations: Vec<LocationIdx> = (0..n).map(LocationIdx::new).collect();

        let (brute, dp, heuristic) = solve_variants(&matrix, &locations, None, None, false);

        assert!((brute - dp).abs() < 1e-9, "brute {brute} vs dp {dp}");
        assert!(heuristic >= brute - 1e-9);
    }
}

#[test]
fn strategies_agree_when_some_pairs_are_unmeasured() {
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..25 {
        let n = rng.random_range(4..7);
        let mut durations: Vec<Vec<Option<f64>>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            Some(0.0)
                        } else if rng.random_bool(0.15) {
                            None
                        } else {
                            Some(rng.random_range(60.0..3600.0))
                        }
                    })
                    .collect()
            })
            .collect();
        // keep a measured ring so at least one ordering exists
        for i in 0..n {
            let next = (i + 1) % n;
            if durations[i][next].is_none() {
                durations[i][next] = Some(1800.0);
            }
        }
        let distances: Vec<Vec<Option<f64>>> = durations
            .iter()
            .map(|row| row.iter().map(|d| d.map(|v| v * 10.0)).collect())
            .collect();
        let matrix = TravelCostMatrix::from_rows(durations, distances);
        let locations: Vec<LocationIdx> = (0..n).map(LocationIdx::new).collect();

        let cancel = CancelToken::new();
        let problem = OrderingProblem {
            locations: &locations,
            start: Some(LocationIdx::new(0)),
            end: None,
            return_to_start: true,
            matrix: &matrix,
        };

        let brute = solve(&problem, &BRUTE_ONLY, &cancel).unwrap();
        let dp = solve(&problem, &DP_ONLY, &cancel).unwrap();

        assert!(
            (brute.total_duration_secs - dp.total_duration_secs).abs() < 1e-9,
            "brute {} vs dp {}",
            brute.total_duration_secs,
            dp.total_duration_secs
        );
    }
}
