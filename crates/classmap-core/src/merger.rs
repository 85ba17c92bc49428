//! Disjoint-set (union-find) over opaque identifiers

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Union-find with union by rank and path compression.
///
/// Each instance owns all of its state, so independent merges never
/// interfere with each other.
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    index: HashMap<T, usize>,
    items: Vec<T>,
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl<T: Eq + Hash + Clone> DisjointSet<T> {
    pub fn new() -> Self {
        DisjointSet {
            index: HashMap::new(),
            items: Vec::new(),
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }

    /// Register `x` as its own singleton set. No-op if already known.
    pub fn add(&mut self, x: T) {
        self.slot(x);
    }

    /// Canonical representative of `x`'s set. Adds `x` if unseen.
    pub fn find(&mut self, x: &T) -> &T {
        let slot = self.slot(x.clone());
        let root = self.root(slot);
        &self.items[root]
    }

    /// Merge the sets containing `x` and `y`, adding either if unseen.
    pub fn union(&mut self, x: &T, y: &T) {
        let a = self.slot(x.clone());
        let b = self.slot(y.clone());
        let ra = self.root(a);
        let rb = self.root(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
    }

    pub fn same_set(&mut self, x: &T, y: &T) -> bool {
        match (self.index.get(x).copied(), self.index.get(y).copied()) {
            (Some(a), Some(b)) => self.root(a) == self.root(b),
            _ => x == y,
        }
    }

    /// Member sets with more than one element. Order is unspecified.
    pub fn groups(&mut self) -> Vec<HashSet<T>> {
        let mut by_root: HashMap<usize, HashSet<T>> = HashMap::new();
        for slot in 0..self.items.len() {
            let root = self.root(slot);
            by_root
                .entry(root)
                .or_default()
                .insert(self.items[slot].clone());
        }
        by_root.into_values().filter(|g| g.len() > 1).collect()
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn slot(&mut self, x: T) -> usize {
        if let Some(&slot) = self.index.get(&x) {
            return slot;
        }
        let slot = self.items.len();
        self.items.push(x.clone());
        self.parent.push(slot);
        self.rank.push(0);
        self.index.insert(x, slot);
        slot
    }

    fn root(&mut self, slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression: point everything on the walk at the root.
        let mut cur = slot;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }
}

impl<T: Eq + Hash + Clone> Default for DisjointSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
