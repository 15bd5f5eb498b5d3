//! Tests for the signal protocol between explorers and the orchestrator

use lattice::walk::{
    signal_channels, CounterObserver, CounterState, GridBound, Position, RecordingObserver, Signal,
    TaskGroup, WalkReport,
};
use lattice::{LatticeError, PathCounter, WalkConfig};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Counts transitions by kind and keeps the final report
#[derive(Default)]
struct TallyObserver {
    started: AtomicU64,
    finished: AtomicU64,
    report: Mutex<Option<WalkReport>>,
}

impl CounterObserver for TallyObserver {
    fn on_transition(&self, signal: Signal, _state: CounterState) {
        match signal {
            Signal::Started => self.started.fetch_add(1, Ordering::Relaxed),
            Signal::Finished => self.finished.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn on_converged(&self, report: &WalkReport) {
        *self.report.lock().unwrap() = Some(report.clone());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_observer_sees_every_signal() {
    let tally = Arc::new(TallyObserver::default());
    let counter = PathCounter::new(WalkConfig::default())
        .unwrap()
        .with_observer(tally.clone());

    let paths = counter.count(5, 4).await.unwrap();
    assert_eq!(paths, 126);
    assert_eq!(tally.finished.load(Ordering::Relaxed), 126);
    assert_eq!(tally.started.load(Ordering::Relaxed), 125);

    let report = tally.report.lock().unwrap().clone().unwrap();
    assert_eq!(report.paths, 126);
    assert_eq!(report.bound, GridBound::new(5, 4).unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_recorded_history_is_monotonic() {
    let config = WalkConfig::builder().record_transitions(true).build().unwrap();
    let recorder = Arc::new(RecordingObserver::new());
    let report = PathCounter::new(config)
        .unwrap()
        .with_observer(recorder.clone())
        .walk(5, 5)
        .await
        .unwrap();

    assert_eq!(report.transitions, recorder.states());
    for pair in report.transitions.windows(2) {
        let (before, after) = (pair[0], pair[1]);
        assert!(after.started >= before.started);
        assert!(after.finished >= before.finished);
        assert_eq!(
            (after.started - before.started) + (after.finished - before.finished),
            1
        );
    }
    let converged: Vec<_> = report.transitions.iter().filter(|s| s.is_converged()).collect();
    assert_eq!(converged.len(), 1);
}

#[tokio::test]
async fn test_group_closes_channels_when_explorers_end() {
    let (sender, mut receiver) = signal_channels();
    let group = TaskGroup::new(GridBound::new(2, 2).unwrap(), sender);
    let forks = group.fork_counter();
    group.spawn_root();

    let mut state = CounterState::INITIAL;
    while let Some(signal) = receiver.recv().await {
        state = state.apply(signal);
    }
    // Every sender is gone, so every Started has been delivered too
    assert!(state.is_converged());
    assert_eq!(state.finished, 6);
    assert_eq!(forks.get(), 5);
}

#[tokio::test]
async fn test_manual_fork_is_accounted() {
    let (sender, mut receiver) = signal_channels();
    let group = TaskGroup::new(GridBound::new(1, 1).unwrap(), sender);

    group.fork(Position::new(1, 0)).unwrap();
    assert_eq!(receiver.drain_started(), 1);
    drop(group);

    assert_eq!(receiver.recv().await, Some(Signal::Finished));
    assert_eq!(receiver.recv().await, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fork_past_corner_is_refused() {
    let (sender, mut receiver) = signal_channels();
    let group = TaskGroup::new(GridBound::new(1, 1).unwrap(), sender);

    assert!(matches!(
        group.fork(Position::new(2, 2)),
        Err(LatticeError::InvalidGridBound { .. })
    ));
    drop(group);

    assert_eq!(receiver.drain_started(), 0);
    assert_eq!(receiver.recv().await, None);
}
