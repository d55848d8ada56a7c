//! Two-phase spin easing
//!
//! A short quadratic ease-in hands over to a long power ease-out. The
//! progress reached at the breakpoint is chosen so that speed is also
//! continuous there, which removes the visible lurch of a hard handover.
//! This departs from a plain `8t²` ramp: at the defaults (t0 = 0.1, k = 5)
//! the handover comes at ~21.7% of the rotation rather than 8%.

use crate::config::SpinConfig;

/// Maps normalized time to normalized rotation progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinEasing {
    breakpoint: f64,
    exponent: f64,
    breakpoint_progress: f64,
}

impl SpinEasing {
    /// `breakpoint` must lie in (0, 1) and `exponent` be >= 1; callers
    /// validate through `SpinConfig::validate`.
    pub fn new(breakpoint: f64, exponent: f64) -> Self {
        let t0 = breakpoint;
        let k = exponent;
        Self {
            breakpoint,
            exponent,
            breakpoint_progress: k * t0 / (2.0 * (1.0 - t0) + k * t0),
        }
    }

    pub fn from_config(config: &SpinConfig) -> Self {
        Self::new(config.ease_breakpoint, config.ease_exponent)
    }

    pub fn breakpoint(&self) -> f64 {
        self.breakpoint
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Progress reached when acceleration ends
    pub fn breakpoint_progress(&self) -> f64 {
        self.breakpoint_progress
    }

    /// Progress in [0, 1] at normalized time `t`; exactly 0 at t <= 0 and
    /// exactly 1 at t >= 1
    pub fn progress(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let t0 = self.breakpoint;
        let p0 = self.breakpoint_progress;

        if t < t0 {
            let x = t / t0;
            p0 * x * x
        } else {
            let u = (t - t0) / (1.0 - t0);
            let settle = 1.0 - (1.0 - u).powf(self.exponent);
            (p0 + (1.0 - p0) * settle).min(1.0)
        }
    }
}

impl Default for SpinEasing {
    fn default() -> Self {
        Self::from_config(&SpinConfig::default())
    }
}
