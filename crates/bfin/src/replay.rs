//! Offline replay of ballots through a single [`RoundContext`]

use bfin_finality::round_context::RoundContext;
use bfin_finality_core::VoteWeight;
use bfin_finality_core::block::{BlockHash, BlockHeight, HeightHashPair};
use bfin_finality_core::config::FinalizationConfig;
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use tracing::debug;

use crate::LOG_TARGET;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BallotScript {
    pub total_weight: VoteWeight,
    /// Derived from the config ratio if not set
    #[serde(default)]
    pub threshold: Option<VoteWeight>,
    pub ballots: Vec<Ballot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Ballot {
    Prevote {
        height: BlockHeight,
        hashes: Vec<BlockHash>,
        weight: VoteWeight,
    },
    Precommit {
        height: BlockHeight,
        hash: BlockHash,
        weight: VoteWeight,
    },
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ReplayError {
    #[snafu(display("Ballot {idx}: prevote with no hashes"))]
    EmptyPrevote { idx: usize },
    #[snafu(display("Ballot {idx}: prevote of {len} hashes, more than the maximum {max}"))]
    PrevoteTooLong { idx: usize, len: usize, max: u32 },
    #[snafu(display("Ballot {idx}: prevote runs past the maximum height"))]
    PrevoteHeightOverflow { idx: usize },
    #[snafu(display("Ballot {idx}: zero height"))]
    ZeroHeight { idx: usize },
    #[snafu(display(
        "Threshold {threshold} is not a supermajority of total weight {total_weight}"
    ))]
    ThresholdNotSupermajority {
        threshold: VoteWeight,
        total_weight: VoteWeight,
    },
    #[snafu(display("Threshold {threshold} exceeds total weight {total_weight}"))]
    ThresholdAboveTotal {
        threshold: VoteWeight,
        total_weight: VoteWeight,
    },
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// Outcome of a round, as printed by the `replay` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub size: usize,
    pub total_weight: VoteWeight,
    pub threshold: VoteWeight,
    pub best_prevote: Option<HeightHashPair>,
    pub best_precommit: Option<HeightHashPair>,
    pub estimate: Option<HeightHashPair>,
    pub completable: bool,
}

impl RoundSummary {
    pub fn new(context: &RoundContext) -> Self {
        Self {
            size: context.size(),
            total_weight: context.total_weight(),
            threshold: context.threshold(),
            best_prevote: context.try_find_best_prevote(),
            best_precommit: context.try_find_best_precommit(),
            estimate: context.try_find_estimate(),
            completable: context.is_completable(),
        }
    }
}

impl Ballot {
    /// Reject ballot shapes [`RoundContext`] does not expect
    fn validate(&self, idx: usize, config: &FinalizationConfig) -> ReplayResult<()> {
        match self {
            Ballot::Prevote { height, hashes, .. } => {
                if height.is_zero() {
                    return ZeroHeightSnafu { idx }.fail();
                }
                if hashes.is_empty() {
                    return EmptyPrevoteSnafu { idx }.fail();
                }
                let max = config.max_hashes_per_point;
                if !u32::try_from(hashes.len()).is_ok_and(|len| len <= max) {
                    return PrevoteTooLongSnafu {
                        idx,
                        len: hashes.len(),
                        max,
                    }
                    .fail();
                }
                let last_offset = u64::try_from(hashes.len() - 1).ok();
                if last_offset
                    .and_then(|offset| height.checked_add(offset))
                    .is_none()
                {
                    return PrevoteHeightOverflowSnafu { idx }.fail();
                }
            }
            Ballot::Precommit { height, .. } => {
                if height.is_zero() {
                    return ZeroHeightSnafu { idx }.fail();
                }
            }
        }
        Ok(())
    }
}

impl BallotScript {
    /// An explicit threshold must be a strict supermajority of the total weight
    fn validate_threshold(&self) -> ReplayResult<()> {
        let Some(threshold) = self.threshold else {
            return Ok(());
        };
        let total_weight = self.total_weight;
        if total_weight < threshold {
            return ThresholdAboveTotalSnafu {
                threshold,
                total_weight,
            }
            .fail();
        }
        if u128::from(threshold) * 2 <= u128::from(total_weight) {
            return ThresholdNotSupermajoritySnafu {
                threshold,
                total_weight,
            }
            .fail();
        }
        Ok(())
    }
}

/// Validate the script and all the ballots, then feed them in order into a
/// fresh round
pub fn replay(script: &BallotScript, config: &FinalizationConfig) -> ReplayResult<RoundContext> {
    script.validate_threshold()?;
    for (idx, ballot) in script.ballots.iter().enumerate() {
        ballot.validate(idx, config)?;
    }

    let mut context = match script.threshold {
        Some(threshold) => RoundContext::new(script.total_weight, threshold),
        None => RoundContext::from_config(script.total_weight, config),
    };
    debug!(
        target: LOG_TARGET,
        total_weight = context.total_weight(),
        threshold = context.threshold(),
        ballots = script.ballots.len(),
        "Replaying ballots"
    );

    for ballot in &script.ballots {
        match ballot {
            Ballot::Prevote {
                height,
                hashes,
                weight,
            } => context.accept_prevote(*height, hashes, *weight),
            Ballot::Precommit {
                height,
                hash,
                weight,
            } => context.accept_precommit(*height, *hash, *weight),
        }
    }

    Ok(context)
}
