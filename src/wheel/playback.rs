//! Frame stepping for an active spin
//!
//! `Playback` is the clock-free half of the driver: given normalized time it
//! produces the rotation for that frame and the boundary crossings since the
//! previous frame. The async engine feeds it wall-clock time.

use crate::common::types::SpinTrajectory;
use crate::wheel::easing::SpinEasing;
use crate::wheel::segments::segment_width;

/// Output of one animation frame
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Normalized time of this frame, clamped to [0, 1]
    pub time: f64,
    pub progress: f64,
    pub rotation_degrees: f64,
    /// Rotation-frame segment index for each boundary crossed this frame,
    /// in crossing order
    pub crossings: Vec<usize>,
    pub finished: bool,
}

/// Rotation and boundary bookkeeping for one spin
#[derive(Clone, Debug)]
pub struct Playback {
    trajectory: SpinTrajectory,
    segment_count: usize,
    easing: SpinEasing,
    rotation_degrees: f64,
    /// Boundaries passed so far on the unwrapped rotation. Starts at the
    /// resting boundary (0), which never fires.
    boundaries_passed: u64,
    finished: bool,
}

impl Playback {
    pub fn new(trajectory: SpinTrajectory, segment_count: usize, easing: SpinEasing) -> Self {
        Self {
            trajectory,
            segment_count: segment_count.max(1),
            easing,
            rotation_degrees: 0.0,
            boundaries_passed: 0,
            finished: false,
        }
    }

    pub fn trajectory(&self) -> &SpinTrajectory {
        &self.trajectory
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn boundaries_passed(&self) -> u64 {
        self.boundaries_passed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance to normalized time `t`.
    ///
    /// Time never runs backwards: a `t` earlier than a previous frame holds
    /// the current rotation. At `t >= 1` the rotation is exactly the planned
    /// total and the playback is finished.
    pub fn advance(&mut self, t: f64) -> Frame {
        let time = t.clamp(0.0, 1.0);
        let total = self.trajectory.total_rotation_degrees;

        let rotation = if time >= 1.0 {
            total
        } else {
            (self.easing.progress(time) * total).max(self.rotation_degrees)
        };
        self.rotation_degrees = rotation;

        let width = segment_width(self.segment_count);
        let reached = (rotation / width).floor() as u64;
        let n = self.segment_count as u64;
        let crossings = (self.boundaries_passed + 1..=reached)
            .map(|k| (k % n) as usize)
            .collect();
        self.boundaries_passed = self.boundaries_passed.max(reached);

        if time >= 1.0 {
            self.finished = true;
        }

        Frame {
            time,
            progress: if total > 0.0 { rotation / total } else { 1.0 },
            rotation_degrees: rotation,
            crossings,
            finished: self.finished,
        }
    }
}
