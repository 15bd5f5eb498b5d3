use super::grid::GridBound;
use super::group::TaskGroup;
use super::observer::CounterObserver;
use super::signal::{signal_channels, CounterState, Signal, SignalReceiver};
use crate::core::config::WalkConfig;
use crate::core::errors::{LatticeError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Outcome of one converged walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    pub bound: GridBound,
    /// Number of monotonic paths, equal to `finished`
    pub paths: u64,
    pub started: u64,
    pub finished: u64,
    /// Explorers spawned by forks, the root excluded
    pub forks: u64,
    /// Signals received by the orchestrator
    pub signals: u64,
    pub elapsed: Duration,
    /// Every observed counter state, empty unless `record_transitions` is set
    pub transitions: Vec<CounterState>,
}

/// Runs walks and detects their termination by counting signals
pub struct PathCounter {
    config: WalkConfig,
    observer: Option<Arc<dyn CounterObserver>>,
}

impl PathCounter {
    pub fn new(config: WalkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn CounterObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Count the monotonic paths of an `nx` x `ny` grid
    pub async fn count(&self, nx: i64, ny: i64) -> Result<u64> {
        Ok(self.walk(nx, ny).await?.paths)
    }

    /// Like [`count`](Self::count), on a runtime built from the config.
    /// Must not be called from inside a tokio runtime.
    pub fn count_blocking(&self, nx: i64, ny: i64) -> Result<u64> {
        Ok(self.walk_blocking(nx, ny)?.paths)
    }

    pub fn walk_blocking(&self, nx: i64, ny: i64) -> Result<WalkReport> {
        let runtime = self.config.build_runtime()?;
        runtime.block_on(self.walk(nx, ny))
    }

    /// Validate the bound, launch the root explorer and wait until every
    /// spawned explorer is accounted for.
    pub async fn walk(&self, nx: i64, ny: i64) -> Result<WalkReport> {
        let bound = GridBound::new(nx, ny)?;
        self.check_limit(bound)?;

        info!(grid = %bound, "starting lattice walk");
        let timer = Instant::now();

        let (sender, receiver) = signal_channels();
        let group = TaskGroup::new(bound, sender);
        let forks = group.fork_counter();
        group.spawn_root();

        let mut counters = Counters::new(self.config.record_transitions, self.observer.as_deref());
        counters.run(receiver).await?;

        let report = WalkReport {
            bound,
            paths: counters.state.finished,
            started: counters.state.started,
            finished: counters.state.finished,
            forks: forks.get(),
            signals: counters.signals,
            elapsed: timer.elapsed(),
            transitions: counters.transitions,
        };
        debug_assert_eq!(report.forks + 1, report.started);

        info!(
            grid = %bound,
            paths = report.paths,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "lattice walk converged"
        );
        if let Some(observer) = &self.observer {
            observer.on_converged(&report);
        }
        Ok(report)
    }

    fn check_limit(&self, bound: GridBound) -> Result<()> {
        let Some(limit) = self.config.max_paths else {
            return Ok(());
        };
        match bound.expected_paths() {
            Some(paths) if paths <= limit => Ok(()),
            Some(paths) => Err(LatticeError::resource_exhausted("paths", paths, limit)),
            None => Err(LatticeError::resource_exhausted("paths", u64::MAX, limit)),
        }
    }
}

/// The orchestrator's private counter state
struct Counters<'a> {
    state: CounterState,
    signals: u64,
    record: bool,
    transitions: Vec<CounterState>,
    observer: Option<&'a dyn CounterObserver>,
}

impl<'a> Counters<'a> {
    fn new(record: bool, observer: Option<&'a dyn CounterObserver>) -> Self {
        let transitions = if record {
            vec![CounterState::INITIAL]
        } else {
            Vec::new()
        };
        Self {
            state: CounterState::INITIAL,
            signals: 0,
            record,
            transitions,
            observer,
        }
    }

    async fn run(&mut self, mut receiver: SignalReceiver) -> Result<()> {
        while !self.state.is_converged() {
            let Some(signal) = receiver.recv().await else {
                error!(
                    started = self.state.started,
                    finished = self.state.finished,
                    "signal channels closed with explorers unaccounted for"
                );
                return Err(LatticeError::channel_closed(
                    self.state.started,
                    self.state.finished,
                ));
            };

            if signal == Signal::Finished {
                // The two channels are independent: a child's Finished can be
                // selected while its parent's Started still sits in the other
                // queue. That Started was sent before the child was spawned,
                // so it is visible here and must be counted first.
                let drained = receiver.drain_started();
                if drained > 0 {
                    debug!(drained, "counted queued started signals ahead of finished");
                }
                for _ in 0..drained {
                    self.apply(Signal::Started);
                }
            }
            self.apply(signal);
        }
        Ok(())
    }

    fn apply(&mut self, signal: Signal) {
        self.state = self.state.apply(signal);
        self.signals += 1;
        debug_assert!(self.state.started >= self.state.finished);
        if self.record {
            self.transitions.push(self.state);
        }
        if let Some(observer) = self.observer {
            observer.on_transition(signal, self.state);
        }
    }
}
