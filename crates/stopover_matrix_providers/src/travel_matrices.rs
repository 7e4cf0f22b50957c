use serde::{Deserialize, Serialize};

/// TravelMatrices holds the travel duration and distance matrices.
/// Stored as flat row-major vectors; an entry is `None` when the provider
/// could not measure that pair.
///
/// Durations are seconds, distances are meters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TravelMatrices {
    pub durations: Vec<Option<f64>>,
    pub distances: Vec<Option<f64>>,
}

fn hash_entries<H: std::hash::Hasher>(entries: &[Option<f64>], state: &mut H) {
    for entry in entries {
        match entry {
            Some(value) => state.write_u64(value.to_bits()),
            None => state.write_u8(0),
        }
    }
}

impl std::hash::Hash for TravelMatrices {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        hash_entries(&self.durations, state);
        hash_entries(&self.distances, state);
    }
}
