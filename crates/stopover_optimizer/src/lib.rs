pub mod matrix_report;
pub mod plan;
pub mod problem;
pub mod ranking;
pub mod report;
pub mod solver;
pub mod subsets;
mod utils;

pub use utils::cancel::CancelToken;

#[cfg(test)]
pub(crate) mod test_utils;
