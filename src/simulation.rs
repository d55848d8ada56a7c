//! Batch spin simulation
//!
//! Runs winner resolution and trajectory planning many times without any
//! animation, to check the distribution and the landing math in bulk.

use crate::common::traits::ExclusionRule;
use crate::config::SpinConfig;
use crate::errors::SpinError;
use crate::wheel::segments::pointer_segment;
use crate::wheel::selector::{eligible_indices, resolve_winner};
use crate::wheel::trajectory::TrajectoryPlanner;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Result of a simulation batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub spins: usize,
    pub entry_count: usize,
    pub eligible_count: usize,
    /// Wins per entry index
    pub hits: Vec<usize>,
    /// Wins landing on an excluded entry; always 0 for a correct selector
    pub excluded_hits: usize,
    /// Planned rotations that would not rest on their winner
    pub landing_mismatches: usize,
    /// Largest |observed - expected| win count over eligible entries
    pub max_deviation: f64,
    /// Same deviation as a fraction of the expected count
    pub max_relative_deviation: f64,
    pub min_rotation_degrees: f64,
    pub max_rotation_degrees: f64,
    pub execution_time: Duration,
}

impl SimulationReport {
    pub fn is_clean(&self) -> bool {
        self.excluded_hits == 0 && self.landing_mismatches == 0
    }

    pub fn expected_hits(&self) -> f64 {
        if self.eligible_count == 0 {
            0.0
        } else {
            self.spins as f64 / self.eligible_count as f64
        }
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Simulated {} spins over {} entries ({} eligible)\n",
            self.spins, self.entry_count, self.eligible_count
        ));
        report.push_str(&format!("{}\n", "=".repeat(50)));
        report.push_str(&format!("Execution time: {:?}\n", self.execution_time));
        report.push_str(&format!(
            "Expected hits per eligible entry: {:.1}\n",
            self.expected_hits()
        ));
        report.push_str(&format!(
            "Max deviation: {:.1} ({:.2}%)\n",
            self.max_deviation,
            self.max_relative_deviation * 100.0
        ));
        report.push_str(&format!(
            "Rotation range: {:.1}° .. {:.1}°\n",
            self.min_rotation_degrees, self.max_rotation_degrees
        ));
        report.push_str(&format!(
            "Excluded hits: {}, landing mismatches: {}\n",
            self.excluded_hits, self.landing_mismatches
        ));
        report
    }
}

pub struct SpinSimulator {
    planner: TrajectoryPlanner,
    rng: StdRng,
}

impl SpinSimulator {
    pub fn new(config: &SpinConfig) -> Result<Self, SpinError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: &SpinConfig, seed: u64) -> Result<Self, SpinError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: &SpinConfig, rng: StdRng) -> Result<Self, SpinError> {
        config
            .validate()
            .map_err(|e| SpinError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            planner: TrajectoryPlanner::from_config(config)?,
            rng,
        })
    }

    /// Resolve and plan `spins` random spins over `entries`
    pub fn run<S, R>(&mut self, entries: &[S], rule: &R, spins: usize) -> Result<SimulationReport, SpinError>
    where
        S: AsRef<str>,
        R: ExclusionRule + ?Sized,
    {
        let start_time = Instant::now();
        let n = entries.len();
        let eligible = eligible_indices(entries, rule);

        let mut hits = vec![0usize; n];
        let mut excluded_hits = 0;
        let mut landing_mismatches = 0;
        let mut min_rotation = f64::INFINITY;
        let mut max_rotation: f64 = 0.0;

        for _ in 0..spins {
            let winner = resolve_winner(entries, rule, None, &mut self.rng)?;
            let total = self.planner.plan(n, winner, &mut self.rng);

            hits[winner] += 1;
            if rule.is_excluded(entries[winner].as_ref()) {
                excluded_hits += 1;
            }
            if pointer_segment(total, n) != winner {
                landing_mismatches += 1;
            }
            min_rotation = min_rotation.min(total);
            max_rotation = max_rotation.max(total);
        }

        let expected = if eligible.is_empty() {
            0.0
        } else {
            spins as f64 / eligible.len() as f64
        };
        let max_deviation = eligible
            .iter()
            .map(|&index| (hits[index] as f64 - expected).abs())
            .fold(0.0, f64::max);

        let report = SimulationReport {
            spins,
            entry_count: n,
            eligible_count: eligible.len(),
            hits,
            excluded_hits,
            landing_mismatches,
            max_deviation,
            max_relative_deviation: if expected > 0.0 { max_deviation / expected } else { 0.0 },
            min_rotation_degrees: if spins > 0 { min_rotation } else { 0.0 },
            max_rotation_degrees: max_rotation,
            execution_time: start_time.elapsed(),
        };

        tracing::debug!(
            "Simulation finished: {} spins, max deviation {:.1}",
            report.spins,
            report.max_deviation
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::traits::NoExclusion;
    use crate::filter::ExclusionFilter;

    #[test]
    fn test_uniform_over_eligible_entries() {
        let entries = ["a", "b", "c", "d"];
        let mut simulator = SpinSimulator::with_seed(&SpinConfig::default(), 42).unwrap();

        let report = simulator.run(&entries, &NoExclusion, 10_000).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.hits.iter().sum::<usize>(), 10_000);
        assert!(report.max_deviation <= 250.0, "{}", report.summary());
        assert!(report.min_rotation_degrees > 3_600.0);
        assert!(report.max_rotation_degrees <= 360.0 * 21.0);
    }

    #[test]
    fn test_excluded_entries_never_win() {
        let entries = ["IPS-A", "B", "IPS-C", "D"];
        let mut simulator = SpinSimulator::with_seed(&SpinConfig::default(), 7).unwrap();

        let report = simulator.run(&entries, &ExclusionFilter::default(), 2_000).unwrap();

        assert_eq!(report.eligible_count, 2);
        assert_eq!(report.excluded_hits, 0);
        assert_eq!(report.hits[0], 0);
        assert_eq!(report.hits[2], 0);
        assert_eq!(report.hits[1] + report.hits[3], 2_000);
    }

    #[test]
    fn test_all_excluded_fails() {
        let entries = ["ips", "IPS"];
        let mut simulator = SpinSimulator::with_seed(&SpinConfig::default(), 1).unwrap();
        assert_eq!(
            simulator.run(&entries, &ExclusionFilter::default(), 10).unwrap_err(),
            SpinError::AllEntriesExcluded { entry_count: 2 }
        );
    }

    #[test]
    fn test_inverted_revolution_range_is_rejected() {
        let config = SpinConfig {
            min_spins: 12,
            max_spins: 3,
            ..Default::default()
        };
        assert!(matches!(
            SpinSimulator::with_seed(&config, 1),
            Err(SpinError::InvalidConfiguration(_))
        ));
        assert!(SpinSimulator::new(&config).is_err());
    }

    #[test]
    fn test_zero_spins() {
        let mut simulator = SpinSimulator::with_seed(&SpinConfig::default(), 1).unwrap();
        let report = simulator.run(&["a"], &NoExclusion, 0).unwrap();
        assert_eq!(report.hits, vec![0]);
        assert_eq!(report.min_rotation_degrees, 0.0);
    }
}
