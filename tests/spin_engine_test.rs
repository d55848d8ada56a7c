//! End-to-end spins on a paused Tokio clock
//!
//! The clock auto-advances whenever every task is idle, so a full spin
//! completes instantly while still stepping through every frame.

use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use uuid::Uuid;
use wheelspin::{
    config::{SpinConfig, WheelConfig},
    wheel::{pointer_segment, segment_width, BroadcastObserver, RecordingObserver, SpinEngine},
    ExclusionFilter, NoExclusion, SpinError, SpinEvent, SpinObserver, SpinPhase, SpinRequest,
    SpinTrajectory,
};

fn quick_config() -> SpinConfig {
    WheelConfig::quick().spin
}

fn engine_with_recorder(config: SpinConfig, seed: u64) -> (SpinEngine, Arc<RecordingObserver>) {
    let engine = SpinEngine::with_seed(config, seed).expect("valid config");
    let recorder = Arc::new(RecordingObserver::new());
    engine.add_observer(recorder.clone());
    (engine, recorder)
}

#[tokio::test(start_paused = true)]
async fn test_explicit_target_lands_under_pointer() {
    let (engine, recorder) = engine_with_recorder(quick_config(), 1);
    let entries = ["A", "B", "C", "D"];

    let handle = engine
        .request_spin(&entries, &NoExclusion, SpinRequest::to_index(2))
        .unwrap();
    let outcome = handle.wait().await.unwrap();

    assert_eq!(outcome.winner_index, 2);
    assert_eq!(outcome.winner_label, "C");
    assert_eq!(pointer_segment(outcome.trajectory.total_rotation_degrees, 4), 2);
    assert_eq!(recorder.settled(), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn test_request_while_spinning_is_ignored() {
    let (engine, recorder) = engine_with_recorder(quick_config(), 2);
    let entries = ["A", "B", "C"];

    let handle = engine.request_spin(&entries, &NoExclusion, SpinRequest::random()).unwrap();
    let planned = *handle.trajectory();

    tokio::time::sleep(Duration::from_millis(200)).await;
    let err = engine
        .request_spin(&entries, &NoExclusion, SpinRequest::to_index(0))
        .unwrap_err();
    assert_eq!(err, SpinError::SpinAlreadyInProgress);
    assert!(err.is_benign());
    assert_eq!(engine.phase(), SpinPhase::Spinning);

    let outcome = handle.wait().await.unwrap();
    assert_eq!(outcome.trajectory, planned);
    assert_eq!(recorder.settled().len(), 1);

    let metrics = engine.metrics();
    assert_eq!(metrics.spins_requested, 2);
    assert_eq!(metrics.spins_started, 1);
    assert_eq!(metrics.rejected_in_progress, 1);
    assert_eq!(metrics.spins_settled, 1);
}

#[tokio::test(start_paused = true)]
async fn test_filtered_entries_never_win() {
    let (engine, recorder) = engine_with_recorder(quick_config(), 3);
    let entries = ["IPS-Alice", "Bob", "ips-Carol", "Dave"];
    let filter = ExclusionFilter::default();

    for _ in 0..100 {
        let outcome = engine
            .request_spin(&entries, &filter, SpinRequest::random())
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert!(outcome.winner_index == 1 || outcome.winner_index == 3);
        assert_eq!(
            pointer_segment(outcome.trajectory.total_rotation_degrees, entries.len()),
            outcome.winner_index
        );
    }

    assert_eq!(recorder.settled().len(), 100);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_requests_change_nothing() {
    let (engine, _recorder) = engine_with_recorder(quick_config(), 4);

    let outcome = engine
        .request_spin(&["x", "y"], &NoExclusion, SpinRequest::random())
        .unwrap()
        .wait()
        .await
        .unwrap();
    let rotation = engine.current_rotation();

    let empty: [&str; 0] = [];
    assert_eq!(
        engine.request_spin(&empty, &NoExclusion, SpinRequest::random()).unwrap_err(),
        SpinError::EmptyEntryList
    );
    assert_eq!(
        engine
            .request_spin(&["IPS", "ips"], &ExclusionFilter::default(), SpinRequest::random())
            .unwrap_err(),
        SpinError::AllEntriesExcluded { entry_count: 2 }
    );
    assert_eq!(
        engine
            .request_spin(&["x", "y"], &NoExclusion, SpinRequest::to_index(2))
            .unwrap_err(),
        SpinError::InvalidTargetIndex { index: 2, entry_count: 2 }
    );

    assert_eq!(engine.phase(), SpinPhase::Settled);
    assert_eq!(engine.current_rotation(), rotation);
    assert_eq!(engine.last_outcome(), Some(outcome));
}

#[tokio::test(start_paused = true)]
async fn test_boundary_crossings_match_rotation() {
    let config = SpinConfig {
        min_spins: 2,
        max_spins: 2,
        ..quick_config()
    };
    let (engine, recorder) = engine_with_recorder(config, 5);
    let entries = ["1", "2", "3", "4", "5", "6"];

    let outcome = engine
        .request_spin(&entries, &NoExclusion, SpinRequest::to_index(0))
        .unwrap()
        .wait()
        .await
        .unwrap();

    let total = outcome.trajectory.total_rotation_degrees;
    let expected = (total / segment_width(6)).floor() as usize;
    let crossings = recorder.crossings();

    assert!(total > 1_020.0 && total <= 1_080.0);
    assert_eq!(crossings.len(), expected);
    assert_eq!(outcome.boundary_crossings, expected as u64);
    assert_eq!(crossings, (1..=expected).map(|k| k % 6).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_ticks_are_monotonic_and_end_at_total() {
    let (engine, recorder) = engine_with_recorder(quick_config(), 6);

    let outcome = engine
        .request_spin(&["a", "b", "c", "d", "e"], &NoExclusion, SpinRequest::random())
        .unwrap()
        .wait()
        .await
        .unwrap();

    let ticks = recorder.ticks();
    assert!(ticks.len() > 10);
    assert_eq!(ticks[0], 0.0);
    assert!(ticks.windows(2).all(|pair| pair[1] >= pair[0]));
    assert_eq!(*ticks.last().unwrap(), outcome.trajectory.total_rotation_degrees);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_callbacks_and_fails_handle() {
    let (engine, recorder) = engine_with_recorder(quick_config(), 7);

    let handle = engine
        .request_spin(&["a", "b", "c"], &NoExclusion, SpinRequest::random())
        .unwrap();
    let session_id = handle.session_id();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(engine.cancel());
    assert_eq!(engine.phase(), SpinPhase::Idle);

    let err = handle.wait().await.unwrap_err();
    assert_eq!(
        err,
        SpinError::Cancelled {
            session_id: session_id.to_string()
        }
    );

    let ticks_at_cancel = recorder.ticks().len();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(recorder.ticks().len(), ticks_at_cancel);
    assert!(recorder.settled().is_empty());
    assert_eq!(recorder.cancelled(), vec![session_id]);
    assert_eq!(engine.metrics().spins_cancelled, 1);

    // The wheel is usable again straight away
    let outcome = engine
        .request_spin(&["a", "b", "c"], &NoExclusion, SpinRequest::to_index(1))
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(outcome.winner_index, 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_request_acknowledges_settled_result() {
    let (engine, recorder) = engine_with_recorder(quick_config(), 8);
    let entries = ["a", "b", "c"];

    let first = engine
        .request_spin(&entries, &NoExclusion, SpinRequest::random())
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(engine.phase(), SpinPhase::Settled);

    let handle = engine.request_spin(&entries, &NoExclusion, SpinRequest::random()).unwrap();
    assert_eq!(engine.phase(), SpinPhase::Spinning);
    assert_eq!(engine.last_outcome(), None);
    let second = handle.wait().await.unwrap();

    // Rotation restarts from zero for each session
    let second_ticks: Vec<f64> = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            SpinEvent::Tick {
                session_id,
                rotation_degrees,
            } if session_id == second.session_id => Some(rotation_degrees),
            _ => None,
        })
        .collect();
    assert_eq!(second_ticks[0], 0.0);
    assert_ne!(first.session_id, second.session_id);
    assert_eq!(recorder.settled().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_broadcast_observer_streams_a_whole_spin() {
    let engine = SpinEngine::with_seed(quick_config(), 9).unwrap();
    let broadcast = Arc::new(BroadcastObserver::new(4_096));
    let mut receiver = broadcast.subscribe();
    engine.add_observer(broadcast.clone());

    let outcome = engine
        .request_spin(&["a", "b"], &NoExclusion, SpinRequest::to_index(1))
        .unwrap()
        .wait()
        .await
        .unwrap();

    let mut settled = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        assert_eq!(event.session_id(), outcome.session_id);
        if let SpinEvent::Settled { winner_index, .. } = event {
            settled.push(winner_index);
        }
    }
    assert_eq!(settled, vec![1]);
}

/// Reads engine state back from inside its own callbacks
#[derive(Default)]
struct EngineReader {
    engine: OnceLock<Weak<SpinEngine>>,
    seen: Mutex<Vec<(SpinPhase, f64)>>,
}

impl EngineReader {
    fn record(&self) {
        if let Some(engine) = self.engine.get().and_then(Weak::upgrade) {
            let reading = (engine.phase(), engine.current_rotation());
            self.seen.lock().unwrap().push(reading);
        }
    }
}

impl SpinObserver for EngineReader {
    fn on_spin_started(&self, _session_id: Uuid, _trajectory: &SpinTrajectory) {
        self.record();
    }

    fn on_settled(&self, _winner_index: usize) {
        self.record();
    }
}

#[tokio::test(start_paused = true)]
async fn test_observers_can_read_engine_from_callbacks() {
    let engine = Arc::new(SpinEngine::with_seed(quick_config(), 10).unwrap());
    let reader = Arc::new(EngineReader::default());
    reader.engine.set(Arc::downgrade(&engine)).unwrap();
    engine.add_observer(reader.clone());

    let outcome = engine
        .request_spin(&["a", "b", "c"], &NoExclusion, SpinRequest::to_index(0))
        .unwrap()
        .wait()
        .await
        .unwrap();

    let seen = reader.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (SpinPhase::Spinning, 0.0),
            (SpinPhase::Settled, outcome.trajectory.total_rotation_degrees),
        ]
    );
}

/// Fails on every frame once the wheel is moving
struct FaultyRenderer;

impl SpinObserver for FaultyRenderer {
    fn on_tick(&self, rotation_degrees: f64) {
        if rotation_degrees > 0.0 {
            panic!("render surface lost at {rotation_degrees}");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_panicking_observer_does_not_wedge_the_engine() {
    let engine = SpinEngine::with_seed(quick_config(), 11).unwrap();
    let recorder = Arc::new(RecordingObserver::new());
    engine.add_observer(Arc::new(FaultyRenderer));
    engine.add_observer(recorder.clone());
    let entries = ["a", "b", "c", "d"];

    let first = engine
        .request_spin(&entries, &NoExclusion, SpinRequest::to_index(1))
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(first.winner_index, 1);
    assert_eq!(engine.phase(), SpinPhase::Settled);
    assert_eq!(recorder.settled(), vec![1]);
    assert_eq!(
        *recorder.ticks().last().unwrap(),
        first.trajectory.total_rotation_degrees
    );

    let second = engine
        .request_spin(&entries, &NoExclusion, SpinRequest::to_index(3))
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(second.winner_index, 3);

    let metrics = engine.metrics();
    assert_eq!(metrics.spins_settled, 2);
    assert_eq!(metrics.spins_cancelled, 0);
    assert_eq!(metrics.rejected_in_progress, 0);
}
