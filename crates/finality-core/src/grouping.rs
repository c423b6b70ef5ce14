//! Grouping of chain heights into fixed-size buckets
//!
//! Shared by the voting-set epoch arithmetic ([`crate::voting_set`]) and by
//! anything else bucketing heights, e.g. importance/activity snapshots.

use snafu::Snafu;

use crate::block::BlockHeight;

/// Invalid argument passed to the height/epoch arithmetic
///
/// These are caller contract violations (misconfiguration), never retried.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum GroupingError {
    #[snafu(display("Grouping must be non-zero"))]
    ZeroGrouping,
    #[snafu(display("Epoch must be non-zero"))]
    ZeroEpoch,
    #[snafu(display("Height must be non-zero"))]
    ZeroHeight,
    #[snafu(display("Height/epoch arithmetic overflow"))]
    Overflow,
}

pub type GroupingResult<T> = Result<T, GroupingError>;

pub(crate) fn ensure_non_zero_grouping(grouping: u64) -> GroupingResult<()> {
    if grouping == 0 {
        return ZeroGroupingSnafu.fail();
    }
    Ok(())
}

/// Round `height` down to a multiple of `grouping`, but never below `1`
pub fn calculate_grouped_height(height: BlockHeight, grouping: u64) -> GroupingResult<BlockHeight> {
    ensure_non_zero_grouping(grouping)?;

    let grouped = height.to_number() / grouping * grouping;

    Ok(BlockHeight::new(grouped.max(1)))
}
