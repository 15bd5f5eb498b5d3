//! Observer hooks for the orchestrator's counter loop
//!
//! Observers are called synchronously from the orchestrator task, once per
//! applied signal and once at convergence. They never see explorer tasks.

use super::orchestrator::WalkReport;
use super::signal::{CounterState, Signal};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub trait CounterObserver: Send + Sync {
    /// Called after `signal` moved the counters to `state`
    fn on_transition(&self, signal: Signal, state: CounterState);

    /// Optional: called once the walk converged
    ///
    /// Default implementation does nothing
    fn on_converged(&self, _report: &WalkReport) {}
}

/// An observer that logs every transition
pub struct LoggingObserver;

impl CounterObserver for LoggingObserver {
    fn on_transition(&self, signal: Signal, state: CounterState) {
        debug!(
            ?signal,
            started = state.started,
            finished = state.finished,
            active = state.active(),
            "counter transition"
        );
    }

    fn on_converged(&self, report: &WalkReport) {
        info!(
            grid = %report.bound,
            paths = report.paths,
            forks = report.forks,
            "walk converged"
        );
    }
}

/// Keeps every observed state, starting from the initial one
pub struct RecordingObserver {
    states: Mutex<Vec<CounterState>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(vec![CounterState::INITIAL]),
        }
    }

    pub fn states(&self) -> Vec<CounterState> {
        self.states
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterObserver for RecordingObserver {
    fn on_transition(&self, _signal: Signal, state: CounterState) {
        self.states
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(state);
    }
}

/// Fans out to several observers in registration order
pub struct CompositeObserver {
    observers: Vec<Arc<dyn CounterObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn CounterObserver>) {
        self.observers.push(observer);
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterObserver for CompositeObserver {
    fn on_transition(&self, signal: Signal, state: CounterState) {
        for observer in &self.observers {
            observer.on_transition(signal, state);
        }
    }

    fn on_converged(&self, report: &WalkReport) {
        for observer in &self.observers {
            observer.on_converged(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer() {
        let recorder = RecordingObserver::new();
        let state = CounterState::INITIAL.apply(Signal::Started);
        recorder.on_transition(Signal::Started, state);

        assert_eq!(recorder.states(), vec![CounterState::INITIAL, state]);
    }

    #[test]
    fn test_composite_fans_out() {
        let first = Arc::new(RecordingObserver::new());
        let second = Arc::new(RecordingObserver::new());
        let mut composite = CompositeObserver::new();
        composite.add_observer(first.clone());
        composite.add_observer(second.clone());
        composite.add_observer(Arc::new(LoggingObserver));

        let state = CounterState::INITIAL.apply(Signal::Finished);
        composite.on_transition(Signal::Finished, state);

        assert_eq!(first.states().len(), 2);
        assert_eq!(second.states().last(), Some(&state));
    }
}
