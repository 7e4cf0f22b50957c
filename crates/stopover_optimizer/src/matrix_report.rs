use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use stopover_matrix_providers::travel_matrices::TravelMatrices;

use crate::report::{round_km, round_minutes};

/// Human-oriented view of a raw matrix: per-pair minutes and kilometers by
/// location name, `None` where the provider had no measurement.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(rename = "MatrixReport")]
pub struct MatrixReport {
    pub locations: Vec<String>,
    /// Row-major, `durations[from][to]` in minutes (1 decimal).
    pub durations_minutes: Vec<Vec<Option<f64>>>,
    /// Row-major, `distances[from][to]` in kilometers (2 decimals).
    pub distances_km: Vec<Vec<Option<f64>>>,
    pub summary: Option<MatrixSummary>,
}

/// Averages over the measured off-diagonal pairs.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy)]
#[serde(rename = "MatrixSummary")]
pub struct MatrixSummary {
    pub average_duration_minutes: f64,
    pub average_distance_km: f64,
    pub total_pairs: usize,
}

impl MatrixReport {
    pub fn new(locations: Vec<String>, matrices: &TravelMatrices) -> Self {
        let n = locations.len();

        let cell = |entries: &[Option<f64>], i: usize, j: usize| {
            entries.get(i * n + j).copied().flatten()
        };

        let durations_minutes: Vec<Vec<Option<f64>>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| cell(&matrices.durations, i, j).map(round_minutes))
                    .collect()
            })
            .collect();

        let distances_km: Vec<Vec<Option<f64>>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| cell(&matrices.distances, i, j).map(round_km))
                    .collect()
            })
            .collect();

        let mut total_duration = 0.0;
        let mut total_distance = 0.0;
        let mut total_pairs = 0;

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                if let (Some(duration), Some(distance)) =
                    (durations_minutes[i][j], distances_km[i][j])
                {
                    total_duration += duration;
                    total_distance += distance;
                    total_pairs += 1;
                }
            }
        }

        let summary = (total_pairs > 0).then(|| MatrixSummary {
            average_duration_minutes: (total_duration / total_pairs as f64 * 10.0).round() / 10.0,
            average_distance_km: (total_distance / total_pairs as f64 * 100.0).round() / 100.0,
            total_pairs,
        });

        Self {
            locations,
            durations_minutes,
            distances_km,
            summary,
        }
    }
}
