//! Count the monotonic paths of an NxN grid and print the result.
//!
//! Usage: `cargo run --example count_paths -- [N]` (N defaults to 2)

use anyhow::{Context, Result};
use lattice::{LatticeError, PathCounter, WalkConfig};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let side: i64 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("grid size must be an integer, got {:?}", arg))?,
        None => 2,
    };

    let counter = PathCounter::new(WalkConfig::default())?
        .with_observer(Arc::new(lattice::walk::LoggingObserver));
    match counter.count_blocking(side, side) {
        Ok(paths) => {
            println!("n={}", paths);
            Ok(())
        }
        Err(e @ LatticeError::InvalidGridBound { .. }) => Err(e).context("refusing to walk"),
        Err(e) => Err(e.into()),
    }
}
