// Core infrastructure modules
pub mod core {
    pub mod config;
    pub mod errors;
}

pub mod walk;

// Re-exports for convenience
pub use crate::core::config::{WalkConfig, WalkConfigBuilder, Workers};
pub use crate::core::errors::{LatticeError, Result};
pub use walk::{expected_paths, GridBound, PathCounter, Position, WalkReport};

/// Count the monotonic lattice paths from (0, 0) to (`nx`, `ny`).
///
/// Builds a tokio runtime from [`WalkConfig::default`], so it must not be
/// called from inside another runtime; use [`count_paths_async`] there.
pub fn count_paths(nx: i64, ny: i64) -> Result<u64> {
    PathCounter::new(WalkConfig::default())?.count_blocking(nx, ny)
}

/// [`count_paths`] for callers already running on a tokio runtime
pub async fn count_paths_async(nx: i64, ny: i64) -> Result<u64> {
    PathCounter::new(WalkConfig::default())?.count(nx, ny).await
}
