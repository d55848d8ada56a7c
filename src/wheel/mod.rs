//! The spin engine
//!
//! Pure math lives in `segments`, `selector`, `trajectory` and `easing`;
//! `playback` steps a planned spin frame by frame and `engine` runs it on
//! the Tokio clock, reporting to `observers`.

pub mod easing;
pub mod engine;
pub mod observers;
pub mod playback;
pub mod segments;
pub mod selector;
pub mod trajectory;

pub use easing::SpinEasing;
pub use engine::{SpinEngine, SpinHandle};
pub use observers::{BroadcastObserver, LoggingObserver, RecordingObserver};
pub use playback::{Frame, Playback};
pub use segments::{pointer_segment, segment_at, segment_width, segments};
pub use selector::{eligible_indices, resolve_winner};
pub use trajectory::TrajectoryPlanner;
