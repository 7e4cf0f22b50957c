use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared cancellation flag for a whole optimization request. Solvers check
/// it between permutation steps and DP expansions so a cancelled request
/// returns promptly instead of finishing every subset.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
