//! Prover-side membership tree.
//!
//! The ledger only keeps the frontier it needs to advance its root; a prover
//! needs every node to produce authentication paths. This is the full tree,
//! stored as one vector per level indexed by position. Positions past the
//! last insertion are implicit zero subtrees.

use halo2_base::halo2_proofs::halo2curves::{bn256::Fr, ff::Field};
use tracing::debug;

use crate::error::CircuitError;
use crate::poseidon_hash::native::NativePoseidon;

/// Deepest tree supported; leaf indices must fit in `u64` with headroom.
pub const MAX_DEPTH: usize = 32;

/// Zero-subtree roots: `zeros[0] = 0`, `zeros[i] = hash(zeros[i-1], zeros[i-1])`.
///
/// Returns `depth + 1` values; the last one is the empty-tree root.
pub fn zero_values(depth: usize) -> Vec<Fr> {
    let mut hasher = NativePoseidon::new();
    let mut zeros = Vec::with_capacity(depth + 1);
    zeros.push(Fr::ZERO);
    for level in 0..depth {
        let below = zeros[level];
        zeros.push(hasher.hash_pair(below, below));
    }
    zeros
}

/// Authentication path for one leaf, leaf level first.
///
/// `indices[i]` is 0 when the node at level `i` is a left child, 1 when it
/// is a right child (bit `i` of the leaf index).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    pub elements: Vec<Fr>,
    pub indices: Vec<Fr>,
}

#[derive(Clone, Debug)]
pub struct MembershipTree {
    depth: usize,
    zeros: Vec<Fr>,
    levels: Vec<Vec<Fr>>,
}

impl MembershipTree {
    pub fn new(depth: usize) -> Result<Self, CircuitError> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(CircuitError::InvalidDepth(depth));
        }
        Ok(Self {
            depth,
            zeros: zero_values(depth),
            levels: vec![Vec::new(); depth + 1],
        })
    }

    /// Rebuild from an ordered leaf list (e.g. replayed `MemberAdded` events).
    pub fn from_leaves(depth: usize, leaves: &[Fr]) -> Result<Self, CircuitError> {
        let mut tree = Self::new(depth)?;
        for leaf in leaves {
            tree.insert(*leaf)?;
        }
        Ok(tree)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn len(&self) -> u64 {
        self.levels[0].len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Append `commitment`, returning its leaf index.
    pub fn insert(&mut self, commitment: Fr) -> Result<u64, CircuitError> {
        let index = self.len();
        if index >= self.capacity() {
            return Err(CircuitError::TreeFull { capacity: self.capacity() });
        }

        let mut hasher = NativePoseidon::new();
        self.levels[0].push(commitment);

        let mut position = index as usize;
        let mut current = commitment;
        for level in 0..self.depth {
            let sibling = self.node(level, position ^ 1);
            current = if position & 1 == 0 {
                hasher.hash_pair(current, sibling)
            } else {
                hasher.hash_pair(sibling, current)
            };
            position >>= 1;
            self.set_node(level + 1, position, current);
        }

        debug!(index, "membership tree leaf inserted");
        Ok(index)
    }

    pub fn root(&self) -> Fr {
        self.node(self.depth, 0)
    }

    pub fn leaf(&self, index: u64) -> Option<Fr> {
        self.levels[0].get(index as usize).copied()
    }

    /// Position of the first leaf equal to `commitment`.
    pub fn position(&self, commitment: &Fr) -> Option<u64> {
        self.levels[0].iter().position(|leaf| leaf == commitment).map(|i| i as u64)
    }

    pub fn path(&self, index: u64) -> Result<MerklePath, CircuitError> {
        if index >= self.len() {
            return Err(CircuitError::LeafIndexOutOfRange { index, len: self.len() });
        }

        let mut elements = Vec::with_capacity(self.depth);
        let mut indices = Vec::with_capacity(self.depth);
        let mut position = index as usize;
        for level in 0..self.depth {
            elements.push(self.node(level, position ^ 1));
            indices.push(Fr::from((position & 1) as u64));
            position >>= 1;
        }
        Ok(MerklePath { elements, indices })
    }

    fn node(&self, level: usize, position: usize) -> Fr {
        self.levels[level].get(position).copied().unwrap_or(self.zeros[level])
    }

    // Parents are filled strictly left to right, so a write is either an
    // overwrite of the rightmost node or an append.
    fn set_node(&mut self, level: usize, position: usize, value: Fr) {
        let nodes = &mut self.levels[level];
        if position < nodes.len() {
            nodes[position] = value;
        } else {
            nodes.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::compute_root_native;
    use proptest::prelude::*;

    #[test]
    fn test_empty_root_is_top_zero() {
        let tree = MembershipTree::new(4).unwrap();
        assert_eq!(tree.root(), zero_values(4)[4]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_every_path_recomputes_root() {
        let leaves: Vec<Fr> = (100..105).map(Fr::from).collect();
        let tree = MembershipTree::from_leaves(3, &leaves).unwrap();
        let mut hasher = NativePoseidon::new();

        for (i, leaf) in leaves.iter().enumerate() {
            let path = tree.path(i as u64).unwrap();
            let root = compute_root_native(&mut hasher, *leaf, &path.elements, &path.indices).unwrap();
            assert_eq!(root, tree.root(), "leaf {i}");
        }
    }

    #[test]
    fn test_path_indices_are_index_bits() {
        let leaves: Vec<Fr> = (0..6).map(Fr::from).collect();
        let tree = MembershipTree::from_leaves(3, &leaves).unwrap();
        let path = tree.path(5).unwrap();
        assert_eq!(path.indices, vec![Fr::ONE, Fr::ZERO, Fr::ONE]);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut tree = MembershipTree::new(2).unwrap();
        for i in 0..4 {
            assert_eq!(tree.insert(Fr::from(i)).unwrap(), i);
        }
        assert_eq!(tree.insert(Fr::from(9)), Err(CircuitError::TreeFull { capacity: 4 }));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_invalid_depth_and_index() {
        assert_eq!(MembershipTree::new(0).unwrap_err(), CircuitError::InvalidDepth(0));
        assert_eq!(MembershipTree::new(33).unwrap_err(), CircuitError::InvalidDepth(33));

        let tree = MembershipTree::from_leaves(3, &[Fr::from(7)]).unwrap();
        assert_eq!(
            tree.path(1).unwrap_err(),
            CircuitError::LeafIndexOutOfRange { index: 1, len: 1 }
        );
        assert_eq!(tree.position(&Fr::from(7)), Some(0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_path_of_last_insert_matches_root(leaves in prop::collection::vec(any::<u64>(), 1..9)) {
            let leaves: Vec<Fr> = leaves.into_iter().map(Fr::from).collect();
            let tree = MembershipTree::from_leaves(3, &leaves).unwrap();
            let last = leaves.len() as u64 - 1;
            let path = tree.path(last).unwrap();

            let mut hasher = NativePoseidon::new();
            let root = compute_root_native(&mut hasher, leaves[last as usize], &path.elements, &path.indices).unwrap();
            prop_assert_eq!(root, tree.root());
        }
    }
}
