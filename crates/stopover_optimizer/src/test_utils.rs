use crate::problem::{location::LocationIdx, travel_cost_matrix::TravelCostMatrix};

pub(crate) fn idx(i: usize) -> LocationIdx {
    LocationIdx::new(i)
}

/// Fully measured matrix from duration rows; distances are durations scaled
/// by 1000 so both lookups resolve.
pub(crate) fn complete_matrix(durations: &[Vec<f64>]) -> TravelCostMatrix {
    let duration_rows = durations
        .iter()
        .map(|row| row.iter().map(|&v| Some(v)).collect())
        .collect();
    let distance_rows = durations
        .iter()
        .map(|row| row.iter().map(|&v| Some(v * 1000.0)).collect())
        .collect();

    TravelCostMatrix::from_rows(duration_rows, distance_rows)
}
