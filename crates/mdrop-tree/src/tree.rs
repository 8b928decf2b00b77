//! Dense, level-by-level Merkle tree over an ordered leaf sequence.
#![allow(
    clippy::arithmetic_side_effects,
    reason = "Level layout uses index math bounded by the leaf count"
)]

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use mdrop_core::base::Hash256;

use crate::core::TreeError;
use crate::node::hash_pair;
use crate::proof::MerkleProof;

/// Widths and offsets of every level, leaves first, plus the total node count.
fn level_layout(leaf_count: usize) -> (Vec<usize>, Vec<usize>, usize) {
    let mut widths = Vec::new();
    let mut offsets = Vec::new();

    let mut width = leaf_count;
    let mut offset = 0_usize;
    loop {
        widths.push(width);
        offsets.push(offset);
        offset += width;
        if width <= 1 {
            break;
        }
        width = width.div_ceil(2);
    }

    (widths, offsets, offset)
}

/// Build the next level up: pairs are combined with [`hash_pair`], a trailing unpaired
/// node is carried up unchanged.
fn next_level(level: &[Hash256]) -> Vec<Hash256> {
    level
        .chunks(2)
        .filter_map(|pair| pair.iter().copied().reduce(|left, right| hash_pair(&left, &right)))
        .collect()
}

/// An immutable Merkle tree with every level kept in memory.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    level_widths: Vec<usize>,
    level_offsets: Vec<usize>,
    nodes: Vec<Hash256>,
    root: Hash256,
    /// First position of every distinct leaf value.
    leaf_positions: HashMap<Hash256, usize>,
    duplicate_leaves: usize,
}

impl MerkleTree {
    /// Build the tree bottom-up from the ordered leaf sequence.
    ///
    /// Leaf order is preserved: it decides which leaves are paired at each level.
    ///
    /// # Errors
    /// Returns [`TreeError::EmptyInput`] if `leaves` is empty.
    pub fn from_leaves(leaves: &[Hash256]) -> Result<Self, TreeError> {
        if leaves.is_empty() {
            return Err(TreeError::EmptyInput);
        }

        let (level_widths, level_offsets, total_nodes) = level_layout(leaves.len());

        let mut nodes = Vec::with_capacity(total_nodes);
        nodes.extend_from_slice(leaves);

        let mut current = leaves.to_vec();
        while current.len() > 1 {
            current = next_level(&current);
            nodes.extend_from_slice(&current);
        }
        let root = *nodes.last().ok_or(TreeError::EmptyInput)?;

        let mut leaf_positions = HashMap::with_capacity(leaves.len());
        let mut duplicate_leaves = 0_usize;
        for (position, leaf) in leaves.iter().enumerate() {
            match leaf_positions.entry(*leaf) {
                Entry::Vacant(entry) => {
                    entry.insert(position);
                }
                Entry::Occupied(_) => duplicate_leaves += 1,
            }
        }

        debug_assert_eq!(nodes.len(), total_nodes);

        Ok(Self {
            level_widths,
            level_offsets,
            nodes,
            root,
            leaf_positions,
            duplicate_leaves,
        })
    }

    /// The Merkle root.
    #[must_use]
    pub const fn root(&self) -> Hash256 {
        self.root
    }

    /// Number of leaves (including duplicates).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.level_widths.first().copied().unwrap_or_default()
    }

    /// Number of levels above the leaves; zero for a single-leaf tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.level_widths.len().saturating_sub(1)
    }

    /// Number of leaves whose value already appeared earlier in the sequence.
    #[must_use]
    pub const fn duplicate_leaf_count(&self) -> usize {
        self.duplicate_leaves
    }

    /// Nodes of one level, leaves being level 0 and the root the last level.
    #[must_use]
    pub fn level(&self, level: usize) -> Option<&[Hash256]> {
        let offset = *self.level_offsets.get(level)?;
        let width = *self.level_widths.get(level)?;
        self.nodes.get(offset..offset + width)
    }

    /// Position of the first leaf equal to `leaf`.
    #[must_use]
    pub fn position_of(&self, leaf: &Hash256) -> Option<usize> {
        self.leaf_positions.get(leaf).copied()
    }

    /// Inclusion proof for the leaf at `index`.
    ///
    /// Walks from the leaf to the root collecting the sibling at each level. A node that
    /// was carried up unpaired contributes nothing at that level.
    ///
    /// # Errors
    /// Returns [`TreeError::IndexOutOfRange`] if `index` is not a leaf position.
    pub fn proof_at(&self, index: usize) -> Result<MerkleProof, TreeError> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(TreeError::IndexOutOfRange { index, leaf_count });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut position = index;
        for level in 0..self.depth() {
            if let Some(sibling) = self.node_at(level, position ^ 1) {
                siblings.push(sibling);
            }
            position /= 2;
        }

        Ok(MerkleProof::new(siblings))
    }

    /// Inclusion proof for a leaf value.
    ///
    /// If the value occurs more than once, the proof is derived for its first occurrence.
    /// That proof is valid for the value itself, whichever row it came from.
    ///
    /// # Errors
    /// Returns [`TreeError::LeafNotFound`] if no leaf has this value.
    pub fn proof_for_leaf(&self, leaf: &Hash256) -> Result<MerkleProof, TreeError> {
        let index = self
            .position_of(leaf)
            .ok_or(TreeError::LeafNotFound(*leaf))?;
        self.proof_at(index)
    }

    fn node_at(&self, level: usize, index: usize) -> Option<Hash256> {
        self.level(level)?.get(index).copied()
    }
}
