pub mod location;
pub mod travel_cost_matrix;
