// SPDX-License-Identifier: MIT

//! Finality voting used in BFIN
//!
//! Like the rest of the core, everything here is deterministic and
//! side-effect free: the higher level code receives, verifies and
//! deduplicates ballots, and passes them to a [`round_context::RoundContext`],
//! which only answers queries about the votes it has been given.
//!
//! A [`round_context::RoundContext`] is meant to be owned by a single round
//! driver and has no internal locking.

pub mod hash_tree;
pub mod round_context;

const LOG_TARGET: &str = "bfin::finality";
