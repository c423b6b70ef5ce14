// SPDX-License-Identifier: MIT

//! Core types used in BFIN finality voting
//!
//! Focused on the data formats shared by the vote accumulator and
//! its callers, and on the (pure) arithmetic mapping chain heights
//! to the voting-set epochs whose committee applies to them.

pub mod bincode;
pub mod block;
pub mod config;
pub mod epoch;
pub mod grouping;
pub mod voting_set;

/// Voting power of a committee member, or a sum of those
pub type VoteWeight = u64;
