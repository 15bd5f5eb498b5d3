use super::grid::{Position, Step};
use super::group::TaskGroup;
use tracing::trace;

/// Walk from `position` toward the corner of `group.bound()`.
///
/// Boundary moves stay in this task without signalling. At an interior point
/// the y-move is forked into a new explorer and this task carries on with the
/// x-move. The walk takes at most nx+ny steps and ends with exactly one
/// `Finished`.
pub(crate) fn explore(mut position: Position, group: TaskGroup) {
    let bound = group.bound();
    debug_assert!(bound.contains(position));
    loop {
        match bound.classify(position) {
            Step::Terminal => {
                trace!(grid = %bound, "explorer reached the corner");
                group.finish();
                return;
            }
            Step::Forced(next) => position = next,
            Step::Fork { spawn, keep } => {
                group.spawn_child(spawn);
                position = keep;
            }
        }
    }
}
