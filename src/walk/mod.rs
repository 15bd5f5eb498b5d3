//! Concurrent monotonic lattice-path counting
//!
//! Explorers walk the grid and fork at every interior point. The
//! orchestrator never joins them: it counts `Started` and `Finished`
//! signals and stops once the two counts meet.

mod explorer;
pub mod grid;
pub mod group;
pub mod observer;
pub mod orchestrator;
pub mod signal;

pub use grid::{expected_paths, GridBound, Position, Step};
pub use group::{ForkCounter, TaskGroup};
pub use observer::{CompositeObserver, CounterObserver, LoggingObserver, RecordingObserver};
pub use orchestrator::{PathCounter, WalkReport};
pub use signal::{signal_channels, CounterState, Signal, SignalReceiver, SignalSender};
