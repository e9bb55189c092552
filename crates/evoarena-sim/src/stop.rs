use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared interrupt flag for a training run.
///
/// Clones share the same flag, so one clone can live in a signal handler
/// while the manager samples another. The manager only samples it at
/// generation boundaries, never mid-rollout, so triggering it lets the
/// in-flight generation finish and flush its telemetry before the loop
/// returns.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    triggered: Arc<AtomicBool>,
}

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests an orderly stop after the current generation.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Relaxed)
    }
}
