//! Termination-detection signals and the channels that carry them.
//!
//! Explorers hold a [`SignalSender`]; the orchestrator owns the single
//! [`SignalReceiver`]. Both kinds travel on their own unbounded tokio mpsc
//! channel, so a send never waits for the reader and any number of explorers
//! may send concurrently. Nothing else crosses task boundaries.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// A new explorer was forked and is now active
    Started,
    /// An explorer reached the corner and is ending
    Finished,
}

/// Orchestrator counters. The root explorer is counted as started before
/// any signal arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub started: u64,
    pub finished: u64,
}

impl CounterState {
    pub const INITIAL: CounterState = CounterState {
        started: 1,
        finished: 0,
    };

    pub fn apply(self, signal: Signal) -> Self {
        match signal {
            Signal::Started => Self {
                started: self.started + 1,
                ..self
            },
            Signal::Finished => Self {
                finished: self.finished + 1,
                ..self
            },
        }
    }

    pub fn is_converged(&self) -> bool {
        self.started == self.finished
    }

    /// Explorers started but not yet finished
    pub fn active(&self) -> u64 {
        self.started.saturating_sub(self.finished)
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Create a connected sender/receiver pair
pub fn signal_channels() -> (SignalSender, SignalReceiver) {
    let (started_tx, started_rx) = mpsc::unbounded_channel();
    let (finished_tx, finished_rx) = mpsc::unbounded_channel();
    (
        SignalSender {
            started: started_tx,
            finished: finished_tx,
        },
        SignalReceiver {
            started: started_rx,
            finished: finished_rx,
        },
    )
}

/// Producer side. Cloned into every explorer.
#[derive(Debug, Clone)]
pub struct SignalSender {
    started: UnboundedSender<()>,
    finished: UnboundedSender<()>,
}

impl SignalSender {
    /// Non-blocking send. Returns `false` once the receiver is gone.
    pub fn send(&self, signal: Signal) -> bool {
        let channel = match signal {
            Signal::Started => &self.started,
            Signal::Finished => &self.finished,
        };
        channel.send(()).is_ok()
    }
}

/// Consumer side, owned by the orchestrator
#[derive(Debug)]
pub struct SignalReceiver {
    started: UnboundedReceiver<()>,
    finished: UnboundedReceiver<()>,
}

impl SignalReceiver {
    /// Wait for the next signal from either channel. The select is unbiased
    /// so neither kind can starve the other. Returns `None` once every sender
    /// is dropped and both channels are empty.
    pub async fn recv(&mut self) -> Option<Signal> {
        tokio::select! {
            Some(()) = self.started.recv() => Some(Signal::Started),
            Some(()) = self.finished.recv() => Some(Signal::Finished),
            else => None,
        }
    }

    /// Take every `Started` already queued without waiting. Returns how many.
    pub fn drain_started(&mut self) -> u64 {
        let mut drained = 0;
        while self.started.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_counter_state_machine() {
        let state = CounterState::INITIAL;
        assert!(!state.is_converged());
        assert_eq!(state.active(), 1);

        let state = state.apply(Signal::Started);
        assert_eq!(
            state,
            CounterState {
                started: 2,
                finished: 0
            }
        );

        let state = state.apply(Signal::Finished).apply(Signal::Finished);
        assert!(state.is_converged());
        assert_eq!(state.active(), 0);
    }

    #[test]
    fn test_send_absorbs_bursts_without_reader() {
        // No runtime and no reader: every send must return immediately
        let (sender, _receiver) = signal_channels();
        for _ in 0..10_000 {
            assert!(sender.send(Signal::Started));
            assert!(sender.send(Signal::Finished));
        }
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (sender, receiver) = signal_channels();
        drop(receiver);
        assert!(!sender.send(Signal::Finished));
    }

    #[test]
    fn test_multi_producer_delivery() {
        let (sender, mut receiver) = signal_channels();
        let producers: Vec<_> = (0..8)
            .map(|_| {
                let sender = sender.clone();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        sender.send(Signal::Started);
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }
        assert_eq!(receiver.drain_started(), 8_000);
        assert_eq!(receiver.drain_started(), 0);
    }

    #[tokio::test]
    async fn test_recv_both_kinds_then_close() {
        let (sender, mut receiver) = signal_channels();
        sender.send(Signal::Started);
        sender.send(Signal::Finished);
        sender.send(Signal::Finished);
        drop(sender);

        let mut seen = Vec::new();
        while let Some(signal) = receiver.recv().await {
            seen.push(signal);
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen.iter().filter(|s| **s == Signal::Started).count(), 1);
    }

    #[tokio::test]
    async fn test_recv_is_not_biased() {
        let (sender, mut receiver) = signal_channels();
        for _ in 0..100 {
            sender.send(Signal::Started);
            sender.send(Signal::Finished);
        }

        let mut started = 0;
        let mut finished = 0;
        for _ in 0..40 {
            match receiver.recv().await {
                Some(Signal::Started) => started += 1,
                Some(Signal::Finished) => finished += 1,
                None => unreachable!("sender still alive"),
            }
        }
        assert!(started > 0 && finished > 0);
    }
}
