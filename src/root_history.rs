// src/root_history.rs

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// The last `capacity` distinct roots, oldest first.
///
/// Ring buffer for order plus a set for O(1) membership. Pushing a root that
/// is already present moves it to the newest slot instead of duplicating it.
#[derive(Clone, Debug)]
pub struct RootHistory<K> {
    capacity: usize,
    order: VecDeque<K>,
    known: HashSet<K>,
}

impl<K: Eq + Hash + Clone> RootHistory<K> {
    /// A zero capacity is treated as one: the current root is always known.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            known: HashSet::with_capacity(capacity),
        }
    }

    /// Record `root` as the newest; returns the evicted root, if any.
    pub fn push(&mut self, root: K) -> Option<K> {
        if self.known.contains(&root) {
            if let Some(pos) = self.order.iter().position(|r| r == &root) {
                self.order.remove(pos);
            }
            self.order.push_back(root);
            return None;
        }

        let evicted = if self.order.len() == self.capacity {
            self.order.pop_front().map(|old| {
                self.known.remove(&old);
                old
            })
        } else {
            None
        };

        self.known.insert(root.clone());
        self.order.push_back(root);
        evicted
    }

    pub fn contains(&self, root: &K) -> bool {
        self.known.contains(root)
    }

    pub fn latest(&self) -> Option<&K> {
        self.order.back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}
