//! Progress reporting seam for the conversion loop.
//!
//! The binary renders a progress bar; tests and quiet runs use
//! [`SilentProgress`].

use std::sync::atomic::{AtomicU64, Ordering};

pub trait ProgressSink: Send + Sync {
    /// Called once with the number of candidates.
    fn begin(&self, total: u64);

    /// Called after every accepted conversion with the running count.
    fn set_completed(&self, completed: u64);

    fn finish(&self, completed: u64);
}

/// No-op tracker that still records the counts it was given.
#[derive(Debug, Default)]
pub struct SilentProgress {
    total: AtomicU64,
    completed: AtomicU64,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

impl ProgressSink for SilentProgress {
    fn begin(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
    }

    fn set_completed(&self, completed: u64) {
        self.completed.store(completed, Ordering::Relaxed);
    }

    fn finish(&self, completed: u64) {
        self.completed.store(completed, Ordering::Relaxed);
    }
}
