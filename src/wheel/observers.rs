//! Ready-made spin observers
//!
//! `BroadcastObserver` turns callbacks into a `SpinEvent` channel for any
//! number of subscribers, `RecordingObserver` keeps events in memory and
//! `LoggingObserver` writes them to `tracing`.

use crate::common::traits::SpinObserver;
use crate::common::types::{SpinEvent, SpinTrajectory};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

/// Session id of the spin currently being observed
#[derive(Debug, Default)]
struct CurrentSession(Mutex<Option<Uuid>>);

impl CurrentSession {
    fn set(&self, session_id: Uuid) {
        if let Ok(mut current) = self.0.lock() {
            *current = Some(session_id);
        }
    }

    fn get(&self) -> Uuid {
        self.0.lock().ok().and_then(|current| *current).unwrap_or_else(Uuid::nil)
    }
}

/// Fans spin events out over a broadcast channel
pub struct BroadcastObserver {
    sender: broadcast::Sender<SpinEvent>,
    session: CurrentSession,
}

impl BroadcastObserver {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            session: CurrentSession::default(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SpinEvent> {
        self.sender.subscribe()
    }

    /// Subscribe as a `Stream`; lagging consumers see `Err` items
    pub fn stream(&self) -> BroadcastStream<SpinEvent> {
        BroadcastStream::new(self.sender.subscribe())
    }

    fn publish(&self, event: SpinEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}

impl SpinObserver for BroadcastObserver {
    fn on_spin_started(&self, session_id: Uuid, _trajectory: &SpinTrajectory) {
        self.session.set(session_id);
    }

    fn on_tick(&self, rotation_degrees: f64) {
        self.publish(SpinEvent::Tick {
            session_id: self.session.get(),
            rotation_degrees,
        });
    }

    fn on_segment_boundary_crossed(&self, segment_index: usize) {
        self.publish(SpinEvent::SegmentBoundaryCrossed {
            session_id: self.session.get(),
            segment_index,
        });
    }

    fn on_settled(&self, winner_index: usize) {
        self.publish(SpinEvent::Settled {
            session_id: self.session.get(),
            winner_index,
        });
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    session: CurrentSession,
    events: Mutex<Vec<SpinEvent>>,
    cancelled: Mutex<Vec<Uuid>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SpinEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn ticks(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SpinEvent::Tick { rotation_degrees, .. } => Some(rotation_degrees),
                _ => None,
            })
            .collect()
    }

    pub fn crossings(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SpinEvent::SegmentBoundaryCrossed { segment_index, .. } => Some(segment_index),
                _ => None,
            })
            .collect()
    }

    pub fn settled(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SpinEvent::Settled { winner_index, .. } => Some(winner_index),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled(&self) -> Vec<Uuid> {
        self.cancelled.lock().map(|ids| ids.clone()).unwrap_or_default()
    }

    fn push(&self, event: SpinEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl SpinObserver for RecordingObserver {
    fn on_spin_started(&self, session_id: Uuid, _trajectory: &SpinTrajectory) {
        self.session.set(session_id);
    }

    fn on_tick(&self, rotation_degrees: f64) {
        self.push(SpinEvent::Tick {
            session_id: self.session.get(),
            rotation_degrees,
        });
    }

    fn on_segment_boundary_crossed(&self, segment_index: usize) {
        self.push(SpinEvent::SegmentBoundaryCrossed {
            session_id: self.session.get(),
            segment_index,
        });
    }

    fn on_settled(&self, winner_index: usize) {
        self.push(SpinEvent::Settled {
            session_id: self.session.get(),
            winner_index,
        });
    }

    fn on_cancelled(&self, session_id: Uuid) {
        if let Ok(mut ids) = self.cancelled.lock() {
            ids.push(session_id);
        }
    }
}

/// Logs spin progress; frame ticks only when `log_ticks` is set
#[derive(Debug, Default)]
pub struct LoggingObserver {
    log_ticks: bool,
}

impl LoggingObserver {
    pub fn new(log_ticks: bool) -> Self {
        Self { log_ticks }
    }
}

impl SpinObserver for LoggingObserver {
    fn on_spin_started(&self, session_id: Uuid, trajectory: &SpinTrajectory) {
        tracing::info!(
            "Spin {} started: {:.1}° over {:.1}s toward index {}",
            session_id,
            trajectory.total_rotation_degrees,
            trajectory.duration_seconds,
            trajectory.winner_index
        );
    }

    fn on_tick(&self, rotation_degrees: f64) {
        if self.log_ticks {
            tracing::trace!("rotation {:.2}°", rotation_degrees);
        }
    }

    fn on_segment_boundary_crossed(&self, segment_index: usize) {
        tracing::debug!("tick: boundary into segment {}", segment_index);
    }

    fn on_settled(&self, winner_index: usize) {
        tracing::info!("Wheel settled on index {}", winner_index);
    }

    fn on_cancelled(&self, session_id: Uuid) {
        tracing::info!("Spin {} cancelled", session_id);
    }
}
