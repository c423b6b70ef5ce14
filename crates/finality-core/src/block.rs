use std::fmt;

use bfin_util_array_type::{
    array_type_define, array_type_impl_hex_str, array_type_impl_rand, array_type_impl_serde,
    number_type_define, number_type_impl_serde,
};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

number_type_define! {
    /// Height of a block in the chain
    ///
    /// The genesis block is at height `1`; `0` is never a valid height.
    #[derive(Encode, Decode, Clone, Copy)]
    pub struct BlockHeight(u64);
}
number_type_impl_serde!(BlockHeight);

impl BlockHeight {
    pub const GENESIS: Self = Self::new(1);
}

array_type_define! {
    #[derive(Encode, Decode, Copy, Clone)]
    pub struct BlockHash[32];
}
array_type_impl_hex_str!(BlockHash);
array_type_impl_serde!(BlockHash);
array_type_impl_rand!(BlockHash);

impl BlockHash {
    /// Random hash, mostly useful in tests
    pub fn random() -> Self {
        rand::random()
    }

    /// Vector of `count` random hashes, mostly useful in tests
    pub fn random_vec(count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::random()).collect()
    }
}

/// A block candidate: one specific block at one specific height
///
/// Ordered by height first, so sorting a set of pairs sorts them
/// from the chain start.
#[derive(
    Encode,
    Decode,
    Serialize,
    Deserialize,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Default,
)]
pub struct HeightHashPair {
    pub height: BlockHeight,
    pub hash: BlockHash,
}

impl HeightHashPair {
    pub fn new(height: impl Into<BlockHeight>, hash: BlockHash) -> Self {
        Self {
            height: height.into(),
            hash,
        }
    }
}

impl fmt::Display for HeightHashPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}@{}", self.height, self.hash))
    }
}

impl From<(BlockHeight, BlockHash)> for HeightHashPair {
    fn from((height, hash): (BlockHeight, BlockHash)) -> Self {
        Self { height, hash }
    }
}

#[cfg(test)]
mod tests;
