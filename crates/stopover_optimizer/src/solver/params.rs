/// Strategy thresholds, in free (non-fixed) locations.
///
/// Up to `exact_threshold` the solver enumerates every permutation (O(M!)).
/// Between the thresholds it runs Held-Karp (O(2^M * M^2)), still exact.
/// Beyond `dp_threshold` it falls back to the nearest-neighbor heuristic so
/// arbitrarily large problems terminate in polynomial time.
#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    pub exact_threshold: usize,
    pub dp_threshold: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            exact_threshold: 8,
            dp_threshold: 13,
        }
    }
}
