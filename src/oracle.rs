//! Ground truth for range counting over a multiset of keys.
//!
//! Two oracles answer the same questions: [`NaiveOracle`] scans every stored
//! occurrence per query and is obviously correct, while [`FenwickOracle`]
//! keeps per-key counts in a Fenwick tree over a compressed key universe and
//! answers in `O(log n)`. Fixtures are generated with the latter; the former
//! exists to check it.

use crate::operation::{Key, Operation};

/// A dynamic multiset supporting point inserts and inclusive range counts.
pub trait RangeOracle {
    /// Forget every inserted key.
    fn reset(&mut self);

    /// Add one occurrence of `key`. Duplicates are kept.
    fn insert(&mut self, key: Key);

    /// Number of held occurrences `k` with `low <= k <= high`. Always `0` when
    /// `low > high`.
    fn query(&self, low: Key, high: Key) -> u64;
}

/// Runs `operations` against `oracle` in order and collects one answer per
/// query.
pub fn replay<O>(oracle: &mut O, operations: &[Operation]) -> Vec<u64>
where
    O: RangeOracle,
{
    let mut answers = Vec::new();
    for op in operations {
        match *op {
            Operation::Insert { key } => oracle.insert(key),
            Operation::Query { low, high } => answers.push(oracle.query(low, high)),
        }
    }
    answers
}

/// Stores every occurrence in a `Vec` and scans it on each query.
#[derive(Debug, Clone, Default)]
pub struct NaiveOracle {
    keys: Vec<Key>,
}

impl NaiveOracle {
    pub fn new() -> Self {
        NaiveOracle::default()
    }
}

impl RangeOracle for NaiveOracle {
    fn reset(&mut self) {
        self.keys.clear();
    }

    fn insert(&mut self, key: Key) {
        self.keys.push(key);
    }

    fn query(&self, low: Key, high: Key) -> u64 {
        if low > high {
            return 0;
        }
        self.keys.iter().filter(|&&k| low <= k && k <= high).count() as u64
    }
}

/// Range counting oracle backed by a Fenwick tree.
///
/// The tree is indexed by position in `universe`, a sorted list of distinct
/// keys known ahead of time. `tree[i]` (1-indexed) holds the number of
/// occurrences of the keys in the block of positions ending at `i` whose length
/// is `lowbit(i)`. Keys inserted outside the universe are kept in `strays`
/// and scanned, so counts stay exact for any input.
#[derive(Debug, Clone, Default)]
pub struct FenwickOracle {
    universe: Vec<Key>,
    tree: Vec<u64>,
    strays: Vec<Key>,
}

impl FenwickOracle {
    /// An oracle with an empty universe. Every insert lands in the stray list,
    /// which makes this equivalent to [`NaiveOracle`].
    pub fn new() -> Self {
        FenwickOracle::with_universe(std::iter::empty())
    }

    /// An oracle indexed over the given keys. Duplicates and ordering of
    /// `keys` do not matter.
    pub fn with_universe<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        let mut universe: Vec<Key> = keys.into_iter().collect();
        universe.sort_unstable();
        universe.dedup();
        let tree = vec![0; universe.len() + 1];
        FenwickOracle {
            universe,
            tree,
            strays: Vec::new(),
        }
    }

    /// Number of distinct indexed keys.
    pub fn universe_len(&self) -> usize {
        self.universe.len()
    }

    fn add(&mut self, mut i: usize) {
        while i < self.tree.len() {
            self.tree[i] += 1;
            i += lowbit(i);
        }
    }

    // occurrences at the first `i` universe positions
    fn prefix(&self, mut i: usize) -> u64 {
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= lowbit(i);
        }
        sum
    }
}

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

impl RangeOracle for FenwickOracle {
    fn reset(&mut self) {
        for c in self.tree.iter_mut() {
            *c = 0;
        }
        self.strays.clear();
    }

    fn insert(&mut self, key: Key) {
        match self.universe.binary_search(&key) {
            Ok(pos) => self.add(pos + 1),
            Err(_) => self.strays.push(key),
        }
    }

    fn query(&self, low: Key, high: Key) -> u64 {
        if low > high {
            return 0;
        }
        let from = self.universe.partition_point(|&k| k < low);
        let to = self.universe.partition_point(|&k| k <= high);
        let indexed = self.prefix(to) - self.prefix(from);
        let strays = self.strays.iter().filter(|&&k| low <= k && k <= high).count() as u64;
        indexed + strays
    }
}
