//! Grid bound, positions and the move rules of a monotonic walk.

use crate::core::errors::{LatticeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target corner of an (nx+1) x (ny+1) lattice, fixed for one walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBound {
    nx: u32,
    ny: u32,
}

/// A point on the lattice. Each step builds a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub dx: u32,
    pub dy: u32,
}

/// What an explorer does at a given position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Reached the corner
    Terminal,
    /// On a boundary, only one move is possible
    Forced(Position),
    /// Interior point: `spawn` goes to a new explorer, `keep` stays in this one
    Fork { spawn: Position, keep: Position },
}

impl GridBound {
    /// Validate caller input. Negative sides and sides that do not fit a
    /// `u32` coordinate are refused.
    pub fn new(nx: i64, ny: i64) -> Result<Self> {
        if nx < 0 || ny < 0 {
            return Err(LatticeError::invalid_bound(
                nx,
                ny,
                "grid sides must be non-negative",
            ));
        }
        let side = |v: i64| u32::try_from(v);
        match (side(nx), side(ny)) {
            (Ok(nx), Ok(ny)) => Ok(Self { nx, ny }),
            _ => Err(LatticeError::invalid_bound(
                nx,
                ny,
                format!("grid sides must not exceed {}", u32::MAX),
            )),
        }
    }

    pub fn nx(&self) -> u32 {
        self.nx
    }

    pub fn ny(&self) -> u32 {
        self.ny
    }

    pub fn corner(&self) -> Position {
        Position {
            dx: self.nx,
            dy: self.ny,
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.dx <= self.nx && position.dy <= self.ny
    }

    /// Number of monotonic paths from the origin to the corner, if it fits a `u64`
    pub fn expected_paths(&self) -> Option<u64> {
        expected_paths(self.nx, self.ny)
    }

    /// Classify `position`. Rules apply in order: terminal, x boundary,
    /// y boundary, interior fork.
    pub fn classify(&self, position: Position) -> Step {
        let Position { dx, dy } = position;
        if dx == self.nx && dy == self.ny {
            Step::Terminal
        } else if dx == self.nx {
            Step::Forced(position.advance_y())
        } else if dy == self.ny {
            Step::Forced(position.advance_x())
        } else {
            Step::Fork {
                spawn: position.advance_y(),
                keep: position.advance_x(),
            }
        }
    }
}

impl fmt::Display for GridBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.nx, self.ny)
    }
}

impl Position {
    pub const ORIGIN: Position = Position { dx: 0, dy: 0 };

    pub fn new(dx: u32, dy: u32) -> Self {
        Self { dx, dy }
    }

    pub fn advance_x(self) -> Self {
        Self {
            dx: self.dx + 1,
            dy: self.dy,
        }
    }

    pub fn advance_y(self) -> Self {
        Self {
            dx: self.dx,
            dy: self.dy + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// C(nx+ny, nx), or `None` when it overflows a `u64`.
pub fn expected_paths(nx: u32, ny: u32) -> Option<u64> {
    let n = u128::from(nx) + u128::from(ny);
    let k = u128::from(nx.min(ny));
    let mut acc: u128 = 1;
    for i in 1..=k {
        // acc holds C(n-k+i-1, i-1) here, so the division is exact
        acc = acc * (n - k + i) / i;
        if acc > u128::from(u64::MAX) {
            return None;
        }
    }
    u64::try_from(acc).ok()
}
