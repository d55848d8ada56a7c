//! Wheelspin - Wheel of Names Spin Engine
//!
//! Picks a winner from a list of names, optionally skipping entries matched
//! by an exclusion rule, and animates a wheel so that it comes to rest with
//! that winner under the fixed pointer.
//!
//! The engine is headless: it emits rotation ticks, segment-boundary
//! crossings and a single settled result to `SpinObserver`s, and leaves
//! drawing, sound and dialogs to the caller.

pub mod common;
pub mod config;
pub mod errors;
pub mod filter;
pub mod metrics;
pub mod presentation;
pub mod roster;
pub mod simulation;
pub mod wheel;

pub use common::traits::{ExclusionRule, NoExclusion, SpinObserver};
pub use common::types::{Segment, SpinEvent, SpinOutcome, SpinPhase, SpinRequest, SpinTrajectory};
pub use config::{ConfigLoader, WheelConfig};
pub use errors::{ConfigurationError, RosterError, SpinError, WheelError, WheelResult};
pub use filter::ExclusionFilter;
pub use metrics::{SpinMetrics, SpinMonitor};
pub use roster::{Roster, WinnerRecord};
pub use simulation::{SimulationReport, SpinSimulator};
pub use wheel::{SpinEngine, SpinHandle};
