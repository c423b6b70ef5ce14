use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::VoteWeight;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ConfigError {
    #[snafu(display("Threshold ratio size must be non-zero"))]
    ZeroSize,
    #[snafu(display("Threshold {threshold} can't be larger than size {size}"))]
    ThresholdTooLarge { threshold: u32, size: u32 },
    #[snafu(display("Threshold {threshold}/{size} is not a supermajority"))]
    ThresholdNotSupermajority { threshold: u32, size: u32 },
    #[snafu(display("Voting set grouping must be non-zero"))]
    ZeroVotingSetGrouping,
    #[snafu(display("Max hashes per point must be non-zero"))]
    ZeroMaxHashesPerPoint,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Network-wide finalization parameters
///
/// The round threshold is expressed as a ratio `threshold / size` of the
/// total committee weight of a voting set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FinalizationConfig {
    pub size: u32,
    pub threshold: u32,

    /// Number of heights in each voting set (epoch)
    pub voting_set_grouping: u64,

    /// Maximum length of a prevoted hash chain
    pub max_hashes_per_point: u32,
}

impl Default for FinalizationConfig {
    fn default() -> Self {
        Self {
            size: 1000,
            threshold: 670,
            voting_set_grouping: 720,
            max_hashes_per_point: 256,
        }
    }
}

impl FinalizationConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let Self {
            size,
            threshold,
            voting_set_grouping,
            max_hashes_per_point,
        } = *self;

        if size == 0 {
            return ZeroSizeSnafu.fail();
        }
        if size < threshold {
            return ThresholdTooLargeSnafu { threshold, size }.fail();
        }
        // No two disjoint candidates may reach the threshold at the same time
        if u64::from(threshold) * 2 <= u64::from(size) {
            return ThresholdNotSupermajoritySnafu { threshold, size }.fail();
        }
        if voting_set_grouping == 0 {
            return ZeroVotingSetGroupingSnafu.fail();
        }
        if max_hashes_per_point == 0 {
            return ZeroMaxHashesPerPointSnafu.fail();
        }
        Ok(())
    }

    /// Weight needed to reach the threshold out of `total_weight`
    pub fn threshold_weight(&self, total_weight: VoteWeight) -> VoteWeight {
        if self.size == 0 {
            return total_weight;
        }
        let weight =
            u128::from(total_weight) * u128::from(self.threshold) / u128::from(self.size);

        VoteWeight::try_from(weight).unwrap_or(VoteWeight::MAX)
    }
}
