use std::collections::BTreeMap;

use bfin_finality_core::VoteWeight;
use bfin_finality_core::block::{BlockHash, BlockHeight, HeightHashPair};
use bfin_finality_core::config::FinalizationConfig;
use tracing::{debug, trace};

use crate::LOG_TARGET;
use crate::hash_tree::{FinalizationHashTree, NodeIdx};

/// Prevote and precommit weight accumulated by a candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weights {
    pub prevote: VoteWeight,
    pub precommit: VoteWeight,
}

impl Weights {
    pub fn new(prevote: VoteWeight, precommit: VoteWeight) -> Self {
        Self { prevote, precommit }
    }
}

/// Vote accumulator of a single finalization round
///
/// Prevotes build up a [`FinalizationHashTree`] of candidates, precommits
/// are applied to a candidate and all its ancestors. Precommits for
/// candidates that were not prevoted yet are held aside and applied once
/// the candidate shows up; until then they don't count toward anything.
///
/// All the queries assume `2 * threshold > total_weight`, which is not
/// checked here.
#[derive(Debug, Clone)]
pub struct RoundContext {
    total_weight: VoteWeight,
    threshold: VoteWeight,

    tree: FinalizationHashTree,
    /// Indexed by [`NodeIdx`] of `tree`
    weights: Vec<Weights>,

    pending_precommits: BTreeMap<HeightHashPair, VoteWeight>,
    /// Sum of all precommits applied to known candidates
    applied_precommit_weight: VoteWeight,
}

impl RoundContext {
    pub fn new(total_weight: VoteWeight, threshold: VoteWeight) -> Self {
        Self {
            total_weight,
            threshold,
            tree: FinalizationHashTree::new(),
            weights: vec![],
            pending_precommits: BTreeMap::new(),
            applied_precommit_weight: 0,
        }
    }

    /// Round with the threshold derived from the network's supermajority
    /// ratio
    pub fn from_config(total_weight: VoteWeight, config: &FinalizationConfig) -> Self {
        Self::new(total_weight, config.threshold_weight(total_weight))
    }

    pub fn total_weight(&self) -> VoteWeight {
        self.total_weight
    }

    pub fn threshold(&self) -> VoteWeight {
        self.threshold
    }

    /// Number of known candidates
    pub fn size(&self) -> usize {
        self.tree.len()
    }

    /// Weights of a candidate, zero for unknown ones
    pub fn weights(&self, key: &HeightHashPair) -> Weights {
        self.tree
            .find(key)
            .map(|idx| self.node_weights(idx))
            .unwrap_or_default()
    }

    /// Precommit weight held for a candidate that is not known yet
    pub fn pending_precommit_weight(&self, key: &HeightHashPair) -> VoteWeight {
        self.pending_precommits.get(key).copied().unwrap_or_default()
    }

    fn node_weights(&self, idx: NodeIdx) -> Weights {
        self.weights[idx.as_usize()]
    }

    fn node_weights_mut(&mut self, idx: NodeIdx) -> &mut Weights {
        &mut self.weights[idx.as_usize()]
    }

    /// Accept a prevote for the chain of `hashes` starting at `height`
    pub fn accept_prevote(
        &mut self,
        height: BlockHeight,
        hashes: &[BlockHash],
        weight: VoteWeight,
    ) {
        trace!(
            target: LOG_TARGET,
            %height,
            len = hashes.len(),
            weight,
            "Accepting prevote"
        );

        let branch = self.tree.add_branch(height, hashes);
        self.weights.resize(self.tree.len(), Weights::default());

        for node in &branch {
            let weights = self.node_weights_mut(node.idx);
            weights.prevote = weights.prevote.saturating_add(weight);
        }

        for node in branch.iter().filter(|node| node.is_new) {
            let key = self.tree.key(node.idx);
            if let Some(pending_weight) = self.pending_precommits.remove(&key) {
                debug!(
                    target: LOG_TARGET,
                    candidate = %key,
                    weight = pending_weight,
                    "Resolved pending precommit"
                );
                self.apply_precommit(node.idx, pending_weight);
            }
        }
    }

    /// Accept a precommit for the candidate at `height` with `hash`
    pub fn accept_precommit(&mut self, height: BlockHeight, hash: BlockHash, weight: VoteWeight) {
        let key = HeightHashPair::new(height, hash);

        match self.tree.find(&key) {
            Some(idx) => {
                trace!(target: LOG_TARGET, candidate = %key, weight, "Accepting precommit");
                self.apply_precommit(idx, weight);
            }
            None => {
                trace!(
                    target: LOG_TARGET,
                    candidate = %key,
                    weight,
                    "Holding precommit for unknown candidate"
                );
                let pending = self.pending_precommits.entry(key).or_default();
                *pending = pending.saturating_add(weight);
            }
        }
    }

    fn apply_precommit(&mut self, idx: NodeIdx, weight: VoteWeight) {
        let ancestors: Vec<_> = self.tree.ancestors(idx).collect();
        for ancestor in ancestors {
            let weights = self.node_weights_mut(ancestor);
            weights.precommit = weights.precommit.saturating_add(weight);
        }
        self.applied_precommit_weight = self.applied_precommit_weight.saturating_add(weight);
    }

    /// Descend from the first qualifying root, always into the first
    /// qualifying child, as deep as possible
    fn find_deepest(&self, is_qualified: impl Fn(Weights) -> bool) -> Option<NodeIdx> {
        let mut best = self
            .tree
            .roots()
            .iter()
            .copied()
            .find(|idx| is_qualified(self.node_weights(*idx)))?;

        while let Some(child) = self
            .tree
            .children(best)
            .iter()
            .copied()
            .find(|idx| is_qualified(self.node_weights(*idx)))
        {
            best = child;
        }

        Some(best)
    }

    fn find_best_prevote(&self) -> Option<NodeIdx> {
        self.find_deepest(|weights| self.threshold <= weights.prevote)
    }

    /// Deepest candidate prevoted by at least the threshold weight
    pub fn try_find_best_prevote(&self) -> Option<HeightHashPair> {
        self.find_best_prevote().map(|idx| self.tree.key(idx))
    }

    /// Deepest candidate both prevoted and precommitted by at least the
    /// threshold weight
    pub fn try_find_best_precommit(&self) -> Option<HeightHashPair> {
        self.find_deepest(|weights| {
            self.threshold <= weights.prevote && self.threshold <= weights.precommit
        })
        .map(|idx| self.tree.key(idx))
    }

    /// Most precommit weight a candidate could still end up with
    ///
    /// Its current precommits plus every bit of weight that did not
    /// precommit anything known yet. Weight that precommitted anything else
    /// is gone for good.
    fn precommit_bound(&self, idx: NodeIdx) -> VoteWeight {
        let uncommitted = self
            .total_weight
            .saturating_sub(self.applied_precommit_weight);
        self.node_weights(idx).precommit.saturating_add(uncommitted)
    }

    fn can_reach_threshold(&self, idx: NodeIdx) -> bool {
        self.threshold <= self.precommit_bound(idx)
    }

    fn find_estimate(&self) -> Option<NodeIdx> {
        let best_prevote = self.find_best_prevote()?;

        self.tree
            .ancestors(best_prevote)
            .find(|idx| self.can_reach_threshold(*idx))
    }

    /// Deepest ancestor of the best prevote (itself included) that can
    /// still collect enough precommits
    pub fn try_find_estimate(&self) -> Option<HeightHashPair> {
        self.find_estimate().map(|idx| self.tree.key(idx))
    }

    /// Can no other outcome than the current estimate emerge from this
    /// round anymore
    ///
    /// `false` without an estimate; otherwise `true` as long as none of the
    /// estimate's descendants can still collect enough precommits.
    pub fn is_completable(&self) -> bool {
        let Some(estimate) = self.find_estimate() else {
            return false;
        };

        !self
            .tree
            .descendants(estimate)
            .into_iter()
            .any(|idx| self.can_reach_threshold(idx))
    }

    /// See [`FinalizationHashTree::is_descendant`]
    pub fn is_descendant(&self, parent: &HeightHashPair, child: &HeightHashPair) -> bool {
        self.tree.is_descendant(parent, child)
    }

    /// See [`FinalizationHashTree::find_ancestors`]
    pub fn find_ancestors(&self, key: &HeightHashPair) -> Vec<HeightHashPair> {
        self.tree.find_ancestors(key)
    }
}
