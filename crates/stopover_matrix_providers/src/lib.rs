pub mod as_the_crow_flies;
pub mod cache;
pub mod geocoder;
pub mod mapbox_api;
pub mod travel_matrices;
pub mod travel_matrix_client;
pub mod travel_matrix_provider;
