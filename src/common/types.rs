//! Shared type definitions for the spin engine
//!
//! Plain data exchanged between the engine and its collaborators: the
//! derived segments, the per-spin request and trajectory, the reported
//! outcome and the event stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Full circle in degrees
pub const FULL_TURN_DEGREES: f64 = 360.0;

/// One angular wedge of the wheel, derived from one entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub label: String,
    /// Inclusive start angle in degrees
    pub start_angle: f64,
    /// Exclusive end angle in degrees
    pub end_angle: f64,
}

impl Segment {
    pub fn width(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Whether `angle` (already normalized to [0, 360)) falls inside this wedge
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Request to spin the wheel
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinRequest {
    /// `None` picks a random eligible winner; `Some` forces the winner
    pub target_index: Option<usize>,
}

impl SpinRequest {
    pub fn random() -> Self {
        Self { target_index: None }
    }

    pub fn to_index(index: usize) -> Self {
        Self {
            target_index: Some(index),
        }
    }
}

/// Planned rotation for one spin, fixed for the lifetime of that spin
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpinTrajectory {
    pub total_rotation_degrees: f64,
    pub winner_index: usize,
    pub duration_seconds: f64,
}

/// Lifecycle of the engine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpinPhase {
    Idle,
    Spinning,
    Settled,
}

impl fmt::Display for SpinPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinPhase::Idle => write!(f, "idle"),
            SpinPhase::Spinning => write!(f, "spinning"),
            SpinPhase::Settled => write!(f, "settled"),
        }
    }
}

/// Result reported once per spin when the wheel comes to rest
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpinOutcome {
    pub session_id: Uuid,
    pub winner_index: usize,
    pub winner_label: String,
    pub trajectory: SpinTrajectory,
    /// Boundary-crossing events fired during the spin
    pub boundary_crossings: u64,
    pub settled_at: DateTime<Utc>,
}

/// Events emitted while a spin is animating
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SpinEvent {
    Tick {
        session_id: Uuid,
        rotation_degrees: f64,
    },
    SegmentBoundaryCrossed {
        session_id: Uuid,
        segment_index: usize,
    },
    Settled {
        session_id: Uuid,
        winner_index: usize,
    },
}

impl SpinEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            SpinEvent::Tick { session_id, .. }
            | SpinEvent::SegmentBoundaryCrossed { session_id, .. }
            | SpinEvent::Settled { session_id, .. } => *session_id,
        }
    }
}
