// src/accumulator.rs
//
// Incremental Merkle accumulator over identity commitments.
//
// Only the frontier is stored: for each level, the last left child seen
// ("filled subtree"). Right siblings not yet inserted are the precomputed
// zero roots, so each insertion costs exactly `depth` hashes.

use tracing::{debug, info};
use zkvox_circuits::{poseidon_hash::native::NativePoseidon, tree::zero_values, Fr};

use crate::error::DaoError;
use crate::root_history::RootHistory;

type RootKey = [u8; 32];

fn root_key(root: &Fr) -> RootKey {
    root.to_bytes()
}

#[derive(Clone, Debug)]
pub struct Accumulator {
    depth: usize,
    next_index: u64,
    zeros: Vec<Fr>,
    filled_subtrees: Vec<Fr>,
    root: Fr,
    history: RootHistory<RootKey>,
}

impl Accumulator {
    /// Empty tree of `depth` levels remembering `history_size` roots.
    ///
    /// `depth` must be in `1..=32`; `ProtocolConfig::validate` enforces it.
    pub fn new(depth: usize, history_size: usize) -> Self {
        let zeros = zero_values(depth);
        let root = zeros[depth];
        let mut history = RootHistory::new(history_size);
        history.push(root_key(&root));

        debug!(depth, history_size, "accumulator initialized");
        Self {
            depth,
            next_index: 0,
            filled_subtrees: zeros[..depth].to_vec(),
            zeros,
            root,
            history,
        }
    }

    /// Append `commitment` at the next free index.
    pub fn insert(&mut self, commitment: Fr) -> Result<u64, DaoError> {
        let index = self.next_index;
        if index >= self.capacity() {
            return Err(DaoError::CapacityExceeded);
        }

        let mut hasher = NativePoseidon::new();
        let mut position = index;
        let mut current = commitment;
        for level in 0..self.depth {
            let (left, right) = if position & 1 == 0 {
                self.filled_subtrees[level] = current;
                (current, self.zeros[level])
            } else {
                (self.filled_subtrees[level], current)
            };
            current = hasher.hash_pair(left, right);
            position >>= 1;
        }

        self.root = current;
        self.next_index += 1;
        if let Some(evicted) = self.history.push(root_key(&current)) {
            debug!(evicted = %hex::encode(evicted), "root left history window");
        }

        info!(index, "commitment inserted");
        Ok(index)
    }

    pub fn root(&self) -> Fr {
        self.root
    }

    /// Whether `root` is one of the last `history_size` distinct roots.
    pub fn is_known_root(&self, root: &Fr) -> bool {
        self.history.contains(&root_key(root))
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Number of inserted leaves (also the next index).
    pub fn len(&self) -> u64 {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    /// Root of an empty subtree at `level` (0 = leaf).
    pub fn zero(&self, level: usize) -> Option<Fr> {
        self.zeros.get(level).copied()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
