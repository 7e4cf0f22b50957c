use geo::{Distance, Haversine};

use crate::travel_matrices::TravelMatrices;

/// Straight-line fallback matrices: haversine distances and durations at a
/// constant speed. Every pair is measured.
pub fn as_the_crow_flies_matrices<P>(points: &[P], speed_kmh: f64) -> TravelMatrices
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let num_points = points.len();
    let speed_ms = speed_kmh / 3.6;

    let mut durations = vec![Some(0.0); num_points * num_points];
    let mut distances = vec![Some(0.0); num_points * num_points];

    for (i, from) in points.iter().enumerate() {
        for (j, to) in points.iter().enumerate() {
            let meters = Haversine.distance(from.into(), to.into());

            distances[i * num_points + j] = Some(meters);
            durations[i * num_points + j] = Some(meters / speed_ms);
        }
    }

    TravelMatrices {
        durations,
        distances,
    }
}
