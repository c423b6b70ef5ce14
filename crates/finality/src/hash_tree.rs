use std::collections::BTreeMap;

use bfin_finality_core::block::{BlockHash, BlockHeight, HeightHashPair};
use convi::CastInto as _;
use derive_more::{Display, From};

/// Index of a node in the [`FinalizationHashTree`] arena
///
/// Nodes are never removed, so an index stays valid for the lifetime of
/// the tree that returned it.
#[derive(From, Display, PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub struct NodeIdx(u32);

impl NodeIdx {
    pub fn as_usize(self) -> usize {
        self.0.cast_into()
    }
}

#[derive(Debug, Clone)]
struct Node {
    key: HeightHashPair,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
}

/// Node touched by [`FinalizationHashTree::add_branch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchNode {
    pub idx: NodeIdx,
    /// `true` if the node did not exist before
    pub is_new: bool,
}

/// Forest of block candidates
///
/// Each node is a `(height, hash)` pair. A node created by
/// [`Self::add_branch`] is linked as the child of the node preceding it in
/// the branch, so its parent is always exactly one height lower. Nodes are
/// never re-linked, so a node created as a root stays a root.
#[derive(Debug, Clone, Default)]
pub struct FinalizationHashTree {
    nodes: Vec<Node>,
    index: BTreeMap<HeightHashPair, NodeIdx>,
    roots: Vec<NodeIdx>,
}

impl FinalizationHashTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: &HeightHashPair) -> bool {
        self.index.contains_key(key)
    }

    pub fn find(&self, key: &HeightHashPair) -> Option<NodeIdx> {
        self.index.get(key).copied()
    }

    pub fn key(&self, idx: NodeIdx) -> HeightHashPair {
        self.node(idx).key
    }

    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.node(idx).parent
    }

    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.node(idx).children
    }

    /// Nodes without a parent, in creation order
    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.as_usize()]
    }

    /// Add a branch of consecutive blocks, `hashes[i]` being the block at
    /// `start_height + i`
    ///
    /// Returns every node of the branch, in branch order. A branch that would
    /// run past the maximum height is cut short.
    pub fn add_branch(
        &mut self,
        start_height: BlockHeight,
        hashes: &[BlockHash],
    ) -> Vec<BranchNode> {
        let mut branch = Vec::with_capacity(hashes.len());
        let mut prev: Option<NodeIdx> = None;

        for (offset, hash) in hashes.iter().enumerate() {
            let Some(height) = u64::try_from(offset)
                .ok()
                .and_then(|offset| start_height.checked_add(offset))
            else {
                break;
            };
            let key = HeightHashPair::new(height, *hash);

            let node = match self.index.get(&key) {
                Some(&idx) => BranchNode { idx, is_new: false },
                None => BranchNode {
                    idx: self.insert(key, prev),
                    is_new: true,
                },
            };

            prev = Some(node.idx);
            branch.push(node);
        }

        branch
    }

    fn insert(&mut self, key: HeightHashPair, parent: Option<NodeIdx>) -> NodeIdx {
        let idx = NodeIdx::from(
            u32::try_from(self.nodes.len()).expect("Can't have more than u32::MAX candidates"),
        );

        self.nodes.push(Node {
            key,
            parent,
            children: vec![],
        });
        self.index.insert(key, idx);

        match parent {
            Some(parent) => self.nodes[parent.as_usize()].children.push(idx),
            None => self.roots.push(idx),
        }

        idx
    }

    /// Iterate over `idx` and all its ancestors, up to the root
    pub fn ancestors(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        std::iter::successors(Some(idx), |idx| self.parent(*idx))
    }

    /// All strict descendants of `idx`, depth first
    pub fn descendants(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        let mut descendants = vec![];
        let mut stack: Vec<NodeIdx> = self.children(idx).iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            descendants.push(idx);
            stack.extend(self.children(idx).iter().rev());
        }

        descendants
    }

    /// Is `child` the same node as `parent`, or one of its descendants
    ///
    /// `false` if either of the nodes is unknown.
    pub fn is_descendant(&self, parent: &HeightHashPair, child: &HeightHashPair) -> bool {
        let (Some(parent_idx), Some(child_idx)) = (self.find(parent), self.find(child)) else {
            return false;
        };

        self.ancestors(child_idx)
            .take_while(|idx| parent.height <= self.key(*idx).height)
            .any(|idx| idx == parent_idx)
    }

    /// Path from `key` to its root, starting with `key` itself
    ///
    /// Empty if `key` is unknown.
    pub fn find_ancestors(&self, key: &HeightHashPair) -> Vec<HeightHashPair> {
        let Some(idx) = self.find(key) else {
            return vec![];
        };

        self.ancestors(idx).map(|idx| self.key(idx)).collect()
    }
}

#[cfg(test)]
mod tests;
