use std::sync::Arc;

use crate::problem::location::LocationIdx;

/// One measured leg between two locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub duration_secs: f64,
    pub distance_meters: f64,
}

/// Read-only travel costs between every pair of locations, built once per
/// optimization request and shared across all subset solves.
///
/// Flat row-major storage; `index = from * num_locations + to`. An entry is
/// `None` when the provider could not measure that pair, which is different
/// from a zero-cost leg.
#[derive(Debug, Clone)]
pub struct TravelCostMatrix {
    durations: Arc<Vec<Option<f64>>>,
    distances: Arc<Vec<Option<f64>>>,
    num_locations: usize,
}

impl TravelCostMatrix {
    pub fn from_travel_matrices(
        matrices: stopover_matrix_providers::travel_matrices::TravelMatrices,
        num_locations: usize,
    ) -> anyhow::Result<Self> {
        let expected = num_locations * num_locations;
        if matrices.durations.len() != expected || matrices.distances.len() != expected {
            return Err(anyhow::anyhow!(
                "provider returned {}x{} duration and distance entries, expected {} for {} locations",
                matrices.durations.len(),
                matrices.distances.len(),
                expected,
                num_locations
            ));
        }

        Ok(Self {
            durations: Arc::new(matrices.durations),
            distances: Arc::new(matrices.distances),
            num_locations,
        })
    }

    pub fn from_rows(
        durations: Vec<Vec<Option<f64>>>,
        distances: Vec<Vec<Option<f64>>>,
    ) -> Self {
        let num_locations = durations.len();

        Self {
            durations: Arc::new(durations.into_iter().flatten().collect()),
            distances: Arc::new(distances.into_iter().flatten().collect()),
            num_locations,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    /// The pair is considered unmeasured unless both duration and distance
    /// are present.
    #[inline(always)]
    pub fn leg(&self, from: LocationIdx, to: LocationIdx) -> Option<Leg> {
        if from == to {
            return Some(Leg {
                duration_secs: 0.0,
                distance_meters: 0.0,
            });
        }

        let index = self.index(from, to);

        match (self.durations[index], self.distances[index]) {
            (Some(duration_secs), Some(distance_meters)) => Some(Leg {
                duration_secs,
                distance_meters,
            }),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn duration_secs(&self, from: LocationIdx, to: LocationIdx) -> Option<f64> {
        self.leg(from, to).map(|leg| leg.duration_secs)
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_not_zero_cost() {
        let matrix = TravelCostMatrix::from_rows(
            vec![
                vec![Some(0.0), Some(60.0)],
                vec![None, Some(0.0)],
            ],
            vec![
                vec![Some(0.0), Some(1000.0)],
                vec![Some(1000.0), Some(0.0)],
            ],
        );

        let a = LocationIdx::new(0);
        let b = LocationIdx::new(1);

        assert_eq!(
            matrix.leg(a, b),
            Some(Leg {
                duration_secs: 60.0,
                distance_meters: 1000.0
            })
        );
        // duration is unmeasured, so the whole pair is unmeasured
        assert_eq!(matrix.leg(b, a), None);
        // the diagonal is always a zero leg
        assert_eq!(matrix.duration_secs(b, b), Some(0.0));
    }

    #[test]
    fn test_from_travel_matrices_rejects_wrong_size() {
        let matrices = stopover_matrix_providers::travel_matrices::TravelMatrices {
            durations: vec![Some(0.0); 4],
            distances: vec![Some(0.0); 4],
        };

        assert!(TravelCostMatrix::from_travel_matrices(matrices.clone(), 2).is_ok());
        assert!(TravelCostMatrix::from_travel_matrices(matrices, 3).is_err());
    }
}
