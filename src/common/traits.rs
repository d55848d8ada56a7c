//! Seams between the spin engine and its collaborators
//!
//! The engine consumes an exclusion rule supplied fresh per request and
//! reports progress to observers supplied by the presentation layer.

use crate::common::types::SpinTrajectory;
use uuid::Uuid;

/// Marks entries that may not win.
///
/// Implemented for any `Fn(&str) -> bool`, so a closure works wherever a
/// rule is expected.
pub trait ExclusionRule {
    /// `true` if `label` is currently ineligible to win
    fn is_excluded(&self, label: &str) -> bool;
}

impl<F> ExclusionRule for F
where
    F: Fn(&str) -> bool,
{
    fn is_excluded(&self, label: &str) -> bool {
        self(label)
    }
}

/// Rule that excludes nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExclusion;

impl ExclusionRule for NoExclusion {
    fn is_excluded(&self, _label: &str) -> bool {
        false
    }
}

/// Receives the spin's output stream.
///
/// Callbacks run on the playback task between frames, so they should
/// return quickly. All methods default to no-ops.
pub trait SpinObserver: Send + Sync {
    /// A session entered `Spinning`; the rotation restarts from 0
    fn on_spin_started(&self, _session_id: Uuid, _trajectory: &SpinTrajectory) {}

    /// Current cumulative rotation, once per animation frame
    fn on_tick(&self, _rotation_degrees: f64) {}

    /// A segment boundary passed the pointer
    fn on_segment_boundary_crossed(&self, _segment_index: usize) {}

    /// The wheel came to rest; fired exactly once per spin
    fn on_settled(&self, _winner_index: usize) {}

    /// The session was abandoned before settling; no `on_settled` follows
    fn on_cancelled(&self, _session_id: Uuid) {}
}
