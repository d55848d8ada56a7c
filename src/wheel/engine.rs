//! Spin engine: the Idle → Spinning → Settled state machine
//!
//! A request resolves the winner and plans the trajectory synchronously,
//! then hands the animation to a Tokio task ticking once per frame. The
//! caller gets a `SpinHandle` whose `wait()` resolves exactly once with the
//! outcome, or with `SpinError::Cancelled` if the session is abandoned.
//!
//! Requests must be made from within a Tokio runtime. Observer callbacks
//! all run on the playback task with no engine lock held, so they may read
//! the engine; a panicking observer is detached for the rest of the session.

use crate::common::traits::{ExclusionRule, SpinObserver};
use crate::common::types::{SpinOutcome, SpinPhase, SpinRequest, SpinTrajectory};
use crate::config::SpinConfig;
use crate::errors::SpinError;
use crate::metrics::{SpinMetrics, SpinMonitor};
use crate::wheel::easing::SpinEasing;
use crate::wheel::playback::Playback;
use crate::wheel::selector::resolve_winner;
use crate::wheel::trajectory::TrajectoryPlanner;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

type ObserverList = Vec<Arc<dyn SpinObserver>>;

/// Pending result of an accepted spin request
#[derive(Debug)]
pub struct SpinHandle {
    session_id: Uuid,
    trajectory: SpinTrajectory,
    receiver: oneshot::Receiver<SpinOutcome>,
}

impl SpinHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn trajectory(&self) -> &SpinTrajectory {
        &self.trajectory
    }

    /// Wait for the wheel to settle
    pub async fn wait(self) -> Result<SpinOutcome, SpinError> {
        let session_id = self.session_id;
        self.receiver.await.map_err(|_| SpinError::Cancelled {
            session_id: session_id.to_string(),
        })
    }
}

struct ActiveSession {
    session_id: Uuid,
    task: JoinHandle<()>,
    /// Cleared on cancel; callbacks only fire while holding it set
    live: Arc<Mutex<bool>>,
}

struct EngineState {
    phase: SpinPhase,
    rotation_degrees: f64,
    active: Option<ActiveSession>,
    last_outcome: Option<SpinOutcome>,
}

impl EngineState {
    fn owns(&self, session_id: Uuid) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.session_id == session_id)
    }
}

#[derive(Clone)]
struct Shared {
    state: Arc<Mutex<EngineState>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Everything the playback task needs, moved into it at spawn
struct SessionTask {
    shared: Shared,
    session_id: Uuid,
    playback: Playback,
    winner_label: String,
    duration: Duration,
    frame_interval: Duration,
    observers: ObserverList,
    monitor: Arc<SpinMonitor>,
    live: Arc<Mutex<bool>>,
    completion: oneshot::Sender<SpinOutcome>,
}

/// Drives one spin at a time
pub struct SpinEngine {
    config: SpinConfig,
    planner: TrajectoryPlanner,
    easing: SpinEasing,
    rng: Mutex<StdRng>,
    shared: Shared,
    observers: RwLock<ObserverList>,
    monitor: Arc<SpinMonitor>,
}

impl SpinEngine {
    /// Create an engine seeded from OS entropy
    pub fn new(config: SpinConfig) -> Result<Self, SpinError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with reproducible randomness
    pub fn with_seed(config: SpinConfig, seed: u64) -> Result<Self, SpinError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: SpinConfig, rng: StdRng) -> Result<Self, SpinError> {
        config
            .validate()
            .map_err(|e| SpinError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            planner: TrajectoryPlanner::from_config(&config)?,
            easing: SpinEasing::from_config(&config),
            config,
            rng: Mutex::new(rng),
            shared: Shared {
                state: Arc::new(Mutex::new(EngineState {
                    phase: SpinPhase::Idle,
                    rotation_degrees: 0.0,
                    active: None,
                    last_outcome: None,
                })),
            },
            observers: RwLock::new(Vec::new()),
            monitor: Arc::new(SpinMonitor::new()),
        })
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    /// Register an observer for subsequent spins
    pub fn add_observer(&self, observer: Arc<dyn SpinObserver>) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.shared.lock().phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase() == SpinPhase::Spinning
    }

    /// Cumulative rotation of the current or last spin
    pub fn current_rotation(&self) -> f64 {
        self.shared.lock().rotation_degrees
    }

    /// Outcome of the last settled spin, until acknowledged
    pub fn last_outcome(&self) -> Option<SpinOutcome> {
        self.shared.lock().last_outcome.clone()
    }

    pub fn metrics(&self) -> SpinMetrics {
        self.monitor.snapshot()
    }

    /// Request a spin over `entries`.
    ///
    /// The entry list is read once here; the engine keeps only what it needs
    /// to report the winner. While a spin is animating the request is
    /// ignored with `SpinError::SpinAlreadyInProgress` and nothing changes.
    pub fn request_spin<S, R>(
        &self,
        entries: &[S],
        excluded: &R,
        request: SpinRequest,
    ) -> Result<SpinHandle, SpinError>
    where
        S: AsRef<str>,
        R: ExclusionRule + ?Sized,
    {
        self.monitor.record_request();
        let mut state = self.shared.lock();

        if state.phase == SpinPhase::Spinning {
            tracing::debug!("Ignoring spin request: a spin is already in progress");
            let err = SpinError::SpinAlreadyInProgress;
            self.monitor.record_rejection(&err);
            return Err(err);
        }

        let trajectory = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let planned = resolve_winner(entries, excluded, request.target_index, &mut *rng)
                .map(|winner| self.planner.trajectory(entries.len(), winner, &mut *rng));
            match planned {
                Ok(trajectory) => trajectory,
                Err(err) => {
                    tracing::warn!("Rejected spin request: {}", err);
                    self.monitor.record_rejection(&err);
                    return Err(err);
                }
            }
        };

        let session_id = Uuid::new_v4();
        let winner_label = entries[trajectory.winner_index].as_ref().to_string();
        let observers = self
            .observers
            .read()
            .map(|observers| observers.clone())
            .unwrap_or_default();

        // A settled result not yet acknowledged is consumed by the new spin.
        state.phase = SpinPhase::Spinning;
        state.rotation_degrees = 0.0;
        state.last_outcome = None;

        let (completion, receiver) = oneshot::channel();
        let live = Arc::new(Mutex::new(true));
        let session = SessionTask {
            shared: self.shared.clone(),
            session_id,
            playback: Playback::new(trajectory, entries.len(), self.easing),
            winner_label,
            duration: self.config.duration(),
            frame_interval: self.config.frame_interval(),
            observers,
            monitor: self.monitor.clone(),
            live: live.clone(),
            completion,
        };
        let task = tokio::spawn(session.run());

        state.active = Some(ActiveSession {
            session_id,
            task,
            live,
        });
        self.monitor.record_start();

        tracing::info!(
            "Spin {} started toward index {} ({:.1}°)",
            session_id,
            trajectory.winner_index,
            trajectory.total_rotation_degrees
        );

        Ok(SpinHandle {
            session_id,
            trajectory,
            receiver,
        })
    }

    /// Consume a settled result, returning the engine to `Idle`
    pub fn acknowledge(&self) -> Option<SpinOutcome> {
        let mut state = self.shared.lock();
        if state.phase != SpinPhase::Settled {
            return None;
        }
        state.phase = SpinPhase::Idle;
        state.last_outcome.take()
    }

    /// Stop the in-flight spin, if any. Its handle resolves with
    /// `SpinError::Cancelled` and no further callbacks fire.
    ///
    /// Must not be called from inside an observer callback.
    pub fn cancel(&self) -> bool {
        let active = {
            let mut state = self.shared.lock();
            let active = state.active.take();
            if active.is_some() {
                state.phase = SpinPhase::Idle;
            }
            active
        };

        let Some(active) = active else {
            return false;
        };

        {
            let mut live = active.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *live = false;
        }
        active.task.abort();
        self.monitor.record_cancelled();

        let observers = self
            .observers
            .read()
            .map(|observers| observers.clone())
            .unwrap_or_default();
        for observer in &observers {
            deliver(active.session_id, || observer.on_cancelled(active.session_id));
        }
        tracing::info!("Spin {} cancelled", active.session_id);
        true
    }
}

impl Drop for SpinEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run one observer callback, containing any panic it raises
fn deliver<F: FnOnce()>(session_id: Uuid, callback: F) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!("Observer panicked during spin {}", session_id);
            false
        }
    }
}

/// Per-session observer fan-out; an observer that panics stops receiving
/// callbacks for the rest of the session
struct Dispatcher {
    session_id: Uuid,
    observers: ObserverList,
    faulted: Vec<bool>,
}

impl Dispatcher {
    fn new(session_id: Uuid, observers: ObserverList) -> Self {
        let faulted = vec![false; observers.len()];
        Self {
            session_id,
            observers,
            faulted,
        }
    }

    fn each<F: Fn(&dyn SpinObserver)>(&mut self, callback: F) {
        let session_id = self.session_id;
        for (observer, faulted) in self.observers.iter().zip(self.faulted.iter_mut()) {
            if *faulted {
                continue;
            }
            if !deliver(session_id, || callback(observer.as_ref())) {
                *faulted = true;
            }
        }
    }
}

/// Returns the engine to `Idle` if the playback task is dropped before it
/// settles, e.g. when the runtime shuts down mid-spin
struct SessionGuard {
    shared: Shared,
    session_id: Uuid,
    monitor: Arc<SpinMonitor>,
    observers: ObserverList,
    settled: bool,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let released = {
            let mut state = self.shared.lock();
            if state.owns(self.session_id) {
                state.active = None;
                state.phase = SpinPhase::Idle;
                true
            } else {
                false
            }
        };
        // Cancelled through the engine, which already cleaned up
        if !released {
            return;
        }

        self.monitor.record_cancelled();
        tracing::warn!("Spin {} stopped before settling", self.session_id);
        if !std::thread::panicking() {
            for observer in &self.observers {
                deliver(self.session_id, || observer.on_cancelled(self.session_id));
            }
        }
    }
}

impl SessionTask {
    async fn run(self) {
        let SessionTask {
            shared,
            session_id,
            mut playback,
            winner_label,
            duration,
            frame_interval,
            observers,
            monitor,
            live,
            completion,
        } = self;

        let mut guard = SessionGuard {
            shared: shared.clone(),
            session_id,
            monitor: monitor.clone(),
            observers: observers.clone(),
            settled: false,
        };
        let mut dispatch = Dispatcher::new(session_id, observers);
        let trajectory = *playback.trajectory();

        {
            let live = live.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if !*live {
                return;
            }
            dispatch.each(|observer| observer.on_spin_started(session_id, &trajectory));
        }

        let mut ticker = tokio::time::interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let started = Instant::now();
        let duration_secs = duration.as_secs_f64();

        loop {
            ticker.tick().await;
            let frame = playback.advance(started.elapsed().as_secs_f64() / duration_secs);

            {
                let mut state = shared.lock();
                if !state.owns(session_id) {
                    return;
                }
                state.rotation_degrees = frame.rotation_degrees;
            }

            {
                let live = live.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if !*live {
                    return;
                }
                dispatch.each(|observer| {
                    observer.on_tick(frame.rotation_degrees);
                    for &segment_index in &frame.crossings {
                        observer.on_segment_boundary_crossed(segment_index);
                    }
                });
            }
            monitor.record_frame(frame.crossings.len());

            if frame.finished {
                break;
            }
        }

        let outcome = SpinOutcome {
            session_id,
            winner_index: trajectory.winner_index,
            winner_label,
            trajectory,
            boundary_crossings: playback.boundaries_passed(),
            settled_at: Utc::now(),
        };

        {
            let mut state = shared.lock();
            if !state.owns(session_id) {
                return;
            }
            state.phase = SpinPhase::Settled;
            state.active = None;
            state.last_outcome = Some(outcome.clone());
        }
        guard.settled = true;

        let live = live.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !*live {
            return;
        }
        monitor.record_settled();
        dispatch.each(|observer| observer.on_settled(outcome.winner_index));
        tracing::info!(
            "Spin {} settled on '{}' (index {}) after {} boundary crossings",
            session_id,
            outcome.winner_label,
            outcome.winner_index,
            outcome.boundary_crossings
        );

        // Receiver may have been dropped by an uninterested caller
        let _ = completion.send(outcome);
    }
}
