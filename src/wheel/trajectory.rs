//! Trajectory planning
//!
//! Turns a resolved winner into the total clockwise rotation that parks a
//! point inside the winner's wedge under the pointer after a random number
//! of full revolutions.

use crate::common::types::{SpinTrajectory, FULL_TURN_DEGREES};
use crate::config::SpinConfig;
use crate::errors::SpinError;
use crate::wheel::segments::segment_width;
use rand::Rng;

/// Plans total rotation for a spin; recomputed fresh every spin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryPlanner {
    min_spins: u32,
    max_spins: u32,
    duration_seconds: f64,
}

impl TrajectoryPlanner {
    /// Needs `1 <= min_spins <= max_spins` and a positive, finite duration
    pub fn new(min_spins: u32, max_spins: u32, duration_seconds: f64) -> Result<Self, SpinError> {
        if min_spins < 1 || max_spins < min_spins {
            return Err(SpinError::InvalidConfiguration(format!(
                "revolutions must satisfy 1 <= min ({}) <= max ({})",
                min_spins, max_spins
            )));
        }
        if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
            return Err(SpinError::InvalidConfiguration(format!(
                "duration must be a positive number of seconds, got {}",
                duration_seconds
            )));
        }

        Ok(Self {
            min_spins,
            max_spins,
            duration_seconds,
        })
    }

    pub fn from_config(config: &SpinConfig) -> Result<Self, SpinError> {
        Self::new(config.min_spins, config.max_spins, config.duration_seconds)
    }

    /// Draw revolutions and jitter, returning the total rotation in degrees
    pub fn plan<G: Rng + ?Sized>(&self, segment_count: usize, winner_index: usize, rng: &mut G) -> f64 {
        let revolutions = rng.gen_range(self.min_spins..=self.max_spins);
        let jitter: f64 = rng.gen();
        rotation_for(segment_count, winner_index, revolutions, jitter)
    }

    /// Plan and package the full trajectory for a spin
    pub fn trajectory<G: Rng + ?Sized>(
        &self,
        segment_count: usize,
        winner_index: usize,
        rng: &mut G,
    ) -> SpinTrajectory {
        SpinTrajectory {
            total_rotation_degrees: self.plan(segment_count, winner_index, rng),
            winner_index,
            duration_seconds: self.duration_seconds,
        }
    }
}

/// Rotation bringing `winner_index` (offset by `jitter` in [0, 1) of its
/// width) under the pointer after `revolutions` full turns.
///
/// The result lies in (360 * revolutions, 360 * (revolutions + 1)].
pub fn rotation_for(segment_count: usize, winner_index: usize, revolutions: u32, jitter: f64) -> f64 {
    let width = segment_width(segment_count);
    let offset = FULL_TURN_DEGREES - width * (winner_index as f64 + jitter);
    (FULL_TURN_DEGREES * revolutions as f64 + offset).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::segments::pointer_segment;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_plan_stays_within_revolution_bounds() {
        let planner = TrajectoryPlanner::new(10, 20, 6.0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for n in 1..=40 {
            for winner in 0..n {
                let total = planner.plan(n, winner, &mut rng);
                assert!(total > 360.0 * 10.0, "n={n} winner={winner} total={total}");
                assert!(total <= 360.0 * 21.0, "n={n} winner={winner} total={total}");
            }
        }
    }

    #[test]
    fn test_plan_lands_on_winner_for_random_jitter() {
        let planner = TrajectoryPlanner::new(5, 10, 8.0).unwrap();
        let mut rng = StdRng::seed_from_u64(99);

        for n in 1..=30 {
            for winner in 0..n {
                for _ in 0..20 {
                    let total = planner.plan(n, winner, &mut rng);
                    assert_eq!(pointer_segment(total, n), winner, "n={n} total={total}");
                }
            }
        }
    }

    #[test]
    fn test_zero_jitter_lands_on_winner_start_edge() {
        for n in [1usize, 2, 3, 4, 6, 7, 12, 37] {
            for winner in 0..n {
                let total = rotation_for(n, winner, 3, 0.0);
                assert_eq!(pointer_segment(total, n), winner, "n={n} winner={winner}");
            }
        }
    }

    #[test]
    fn test_jitter_near_one_stays_inside_winner() {
        for n in [2usize, 5, 9] {
            for winner in 0..n {
                let total = rotation_for(n, winner, 4, 0.999);
                assert_eq!(pointer_segment(total, n), winner);
            }
        }
    }

    #[test]
    fn test_rotation_is_always_forward() {
        assert!(rotation_for(4, 3, 1, 0.99) > 360.0);
        assert_eq!(rotation_for(4, 0, 2, 0.0), 360.0 * 3.0);
    }

    #[test]
    fn test_invalid_revolution_range_is_rejected() {
        assert!(matches!(
            TrajectoryPlanner::new(20, 10, 6.0),
            Err(SpinError::InvalidConfiguration(_))
        ));
        assert!(TrajectoryPlanner::new(0, 3, 6.0).is_err());
        assert!(TrajectoryPlanner::new(2, 3, 0.0).is_err());
        assert!(TrajectoryPlanner::new(2, 3, f64::NAN).is_err());

        let config = SpinConfig {
            min_spins: 8,
            max_spins: 4,
            ..Default::default()
        };
        assert!(TrajectoryPlanner::from_config(&config).is_err());
    }

    #[test]
    fn test_trajectory_carries_winner_and_duration() {
        let planner = TrajectoryPlanner::new(1, 1, 2.5).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let trajectory = planner.trajectory(4, 2, &mut rng);

        assert_eq!(trajectory.winner_index, 2);
        assert_eq!(trajectory.duration_seconds, 2.5);
        assert!(trajectory.total_rotation_degrees > 360.0);
        assert!(trajectory.total_rotation_degrees <= 720.0);
    }
}
