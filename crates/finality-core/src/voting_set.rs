//! Mapping between chain heights and finalization epochs
//!
//! Epoch `1` is the genesis block alone. Every following epoch `e` covers
//! `grouping` heights: `(e - 2) * grouping + 1 ..= (e - 1) * grouping`.
//! Note that this makes epoch `2` start at height `1` too, overlapping
//! with the genesis epoch; height `1` itself maps back to epoch `1`.

use std::ops::RangeInclusive;

use serde::Serialize;
use snafu::OptionExt as _;

use crate::block::BlockHeight;
use crate::epoch::FinalizationEpoch;
use crate::grouping::{
    GroupingResult, OverflowSnafu, ZeroEpochSnafu, ZeroHeightSnafu, ensure_non_zero_grouping,
};

fn ensure_valid_epoch(epoch: FinalizationEpoch, grouping: u64) -> GroupingResult<()> {
    ensure_non_zero_grouping(grouping)?;
    if epoch.is_zero() {
        return ZeroEpochSnafu.fail();
    }
    Ok(())
}

/// First height whose votes belong to `epoch`
pub fn calculate_voting_set_start_height(
    epoch: FinalizationEpoch,
    grouping: u64,
) -> GroupingResult<BlockHeight> {
    ensure_valid_epoch(epoch, grouping)?;

    if epoch == FinalizationEpoch::GENESIS {
        return Ok(BlockHeight::GENESIS);
    }

    u64::from(epoch.to_number() - 2)
        .checked_mul(grouping)
        .and_then(|h| h.checked_add(1))
        .map(BlockHeight::new)
        .context(OverflowSnafu)
}

/// Last height whose votes belong to `epoch`
pub fn calculate_voting_set_end_height(
    epoch: FinalizationEpoch,
    grouping: u64,
) -> GroupingResult<BlockHeight> {
    ensure_valid_epoch(epoch, grouping)?;

    if epoch == FinalizationEpoch::GENESIS {
        return Ok(BlockHeight::GENESIS);
    }

    u64::from(epoch.to_number() - 1)
        .checked_mul(grouping)
        .map(BlockHeight::new)
        .context(OverflowSnafu)
}

/// Epoch whose voting set finalizes `height`
pub fn calculate_finalization_epoch_for_height(
    height: BlockHeight,
    grouping: u64,
) -> GroupingResult<FinalizationEpoch> {
    ensure_non_zero_grouping(grouping)?;
    if height.is_zero() {
        return ZeroHeightSnafu.fail();
    }

    if height == BlockHeight::GENESIS {
        return Ok(FinalizationEpoch::GENESIS);
    }

    let height = height.to_number();
    let adjustment = if height % grouping == 0 { 0 } else { 1 };
    (height / grouping)
        .checked_add(1 + adjustment)
        .and_then(|epoch| u32::try_from(epoch).ok())
        .map(FinalizationEpoch::new)
        .context(OverflowSnafu)
}

/// The inclusive range of heights belonging to one finalization epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSetRange {
    pub epoch: FinalizationEpoch,
    pub start: BlockHeight,
    pub end: BlockHeight,
}

impl VotingSetRange {
    pub fn new(epoch: FinalizationEpoch, grouping: u64) -> GroupingResult<Self> {
        Ok(Self {
            epoch,
            start: calculate_voting_set_start_height(epoch, grouping)?,
            end: calculate_voting_set_end_height(epoch, grouping)?,
        })
    }

    /// Range of the epoch that finalizes `height`
    pub fn for_height(height: BlockHeight, grouping: u64) -> GroupingResult<Self> {
        Self::new(
            calculate_finalization_epoch_for_height(height, grouping)?,
            grouping,
        )
    }

    pub fn contains(&self, height: BlockHeight) -> bool {
        self.start <= height && height <= self.end
    }

    /// Number of heights in the range
    pub fn len(&self) -> u64 {
        self.end.to_number() - self.start.to_number() + 1
    }

    /// Always `false`, every epoch covers at least one height
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn heights(&self) -> RangeInclusive<u64> {
        self.start.to_number()..=self.end.to_number()
    }
}
