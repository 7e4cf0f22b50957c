use serde::{Deserialize, Serialize};

use crate::{mapbox_api::MapboxProfile, travel_matrices::TravelMatrices};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum TravelMatrixProvider {
    /// https://docs.mapbox.com/api/navigation/matrix/
    MapboxApi {
        profile: MapboxProfile,
    },

    AsTheCrowFlies {
        speed_kmh: f64,
    },

    Custom {
        matrices: TravelMatrices,
    },
}

impl std::hash::Hash for TravelMatrixProvider {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            TravelMatrixProvider::MapboxApi { profile } => {
                state.write_u8(0);
                profile.hash(state);
            }
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => {
                state.write_u8(1);
                state.write_u64(speed_kmh.to_bits());
            }
            TravelMatrixProvider::Custom { matrices } => {
                state.write_u8(2);
                matrices.hash(state);
            }
        }
    }
}
