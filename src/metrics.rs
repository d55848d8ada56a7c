//! Spin counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::errors::SpinError;

/// Point-in-time copy of the engine counters
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinMetrics {
    pub spins_requested: u64,
    pub spins_started: u64,
    pub spins_settled: u64,
    pub spins_cancelled: u64,
    /// Re-entrant requests ignored while spinning
    pub rejected_in_progress: u64,
    /// Requests refused for invalid input
    pub rejected_invalid: u64,
    pub frames: u64,
    pub boundary_crossings: u64,
}

pub struct SpinMonitor {
    start_time: Instant,
    spins_requested: AtomicU64,
    spins_started: AtomicU64,
    spins_settled: AtomicU64,
    spins_cancelled: AtomicU64,
    rejected_in_progress: AtomicU64,
    rejected_invalid: AtomicU64,
    frames: AtomicU64,
    boundary_crossings: AtomicU64,
}

impl SpinMonitor {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            spins_requested: AtomicU64::new(0),
            spins_started: AtomicU64::new(0),
            spins_settled: AtomicU64::new(0),
            spins_cancelled: AtomicU64::new(0),
            rejected_in_progress: AtomicU64::new(0),
            rejected_invalid: AtomicU64::new(0),
            frames: AtomicU64::new(0),
            boundary_crossings: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self) {
        self.spins_requested.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_start(&self) {
        self.spins_started.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_settled(&self) {
        self.spins_settled.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_cancelled(&self) {
        self.spins_cancelled.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_rejection(&self, error: &SpinError) {
        if error.is_benign() {
            self.rejected_in_progress.fetch_add(1, Ordering::SeqCst);
        } else {
            self.rejected_invalid.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn record_frame(&self, crossings: usize) {
        self.frames.fetch_add(1, Ordering::SeqCst);
        self.boundary_crossings.fetch_add(crossings as u64, Ordering::SeqCst);
    }

    pub fn total_runtime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> SpinMetrics {
        SpinMetrics {
            spins_requested: self.spins_requested.load(Ordering::SeqCst),
            spins_started: self.spins_started.load(Ordering::SeqCst),
            spins_settled: self.spins_settled.load(Ordering::SeqCst),
            spins_cancelled: self.spins_cancelled.load(Ordering::SeqCst),
            rejected_in_progress: self.rejected_in_progress.load(Ordering::SeqCst),
            rejected_invalid: self.rejected_invalid.load(Ordering::SeqCst),
            frames: self.frames.load(Ordering::SeqCst),
            boundary_crossings: self.boundary_crossings.load(Ordering::SeqCst),
        }
    }
}

impl Default for SpinMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_split_by_kind() {
        let monitor = SpinMonitor::new();
        monitor.record_rejection(&SpinError::SpinAlreadyInProgress);
        monitor.record_rejection(&SpinError::EmptyEntryList);
        monitor.record_rejection(&SpinError::AllEntriesExcluded { entry_count: 2 });

        let metrics = monitor.snapshot();
        assert_eq!(metrics.rejected_in_progress, 1);
        assert_eq!(metrics.rejected_invalid, 2);
    }

    #[test]
    fn test_frames_accumulate_crossings() {
        let monitor = SpinMonitor::new();
        monitor.record_frame(0);
        monitor.record_frame(3);

        let metrics = monitor.snapshot();
        assert_eq!(metrics.frames, 2);
        assert_eq!(metrics.boundary_crossings, 3);
    }
}
