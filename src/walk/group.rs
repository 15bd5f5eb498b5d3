//! Task group for explorers.
//!
//! Every child explorer is spawned through a `TaskGroup`, which emits the
//! accounting `Started` before the child exists. The group lives as long as
//! some explorer holds a clone of it; when the last one ends the signal
//! channels close.
//!
//! `fork` refuses positions outside the bound. No boundary rule applies
//! there, so a walk started past the corner would fork forever.

use super::explorer::explore;
use super::grid::{GridBound, Position};
use super::signal::{Signal, SignalSender};
use crate::core::errors::{LatticeError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct TaskGroup {
    bound: GridBound,
    signals: SignalSender,
    forks: Arc<AtomicU64>,
}

/// Read-only view of a group's fork count that holds no signal sender
#[derive(Debug, Clone)]
pub struct ForkCounter(Arc<AtomicU64>);

impl ForkCounter {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }
}

impl TaskGroup {
    pub fn new(bound: GridBound, signals: SignalSender) -> Self {
        Self {
            bound,
            signals,
            forks: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn bound(&self) -> GridBound {
        self.bound
    }

    pub fn fork_counter(&self) -> ForkCounter {
        ForkCounter(self.forks.clone())
    }

    /// Spawn the root explorer at the origin. It is pre-counted by the
    /// orchestrator, so no signal is sent. Consumes the group so the caller
    /// keeps no sender alive.
    pub fn spawn_root(self) {
        tokio::spawn(async move { explore(Position::ORIGIN, self) });
    }

    /// Account for a new explorer, then spawn it at `position`.
    /// Must be called from within a tokio runtime.
    pub fn fork(&self, position: Position) -> Result<()> {
        if !self.bound.contains(position) {
            return Err(LatticeError::invalid_bound(
                i64::from(self.bound.nx()),
                i64::from(self.bound.ny()),
                format!("fork position {} lies outside the grid", position),
            ));
        }
        self.spawn_child(position);
        Ok(())
    }

    /// Unchecked fork used by explorers, whose moves never leave the grid
    pub(crate) fn spawn_child(&self, position: Position) {
        debug_assert!(self.bound.contains(position));
        let forks = self.forks.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(grid = %self.bound, %position, forks, "forking explorer");
        self.signals.send(Signal::Started);
        let group = self.clone();
        tokio::spawn(async move { explore(position, group) });
    }

    /// Report that the calling explorer reached the corner
    pub fn finish(&self) {
        if !self.signals.send(Signal::Finished) {
            trace!(grid = %self.bound, "orchestrator gone, finished signal dropped");
        }
    }
}
