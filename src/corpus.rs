//! Builds the ordered list of test cases that become fixtures.
//!
//! The corpus is a fixed sequence of stages: hand written edge cases first,
//! then randomized workloads of increasing size. All randomness comes from the
//! generator handed to [`CorpusBuilder::new`], so a given seed always yields the
//! same corpus.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::operation::{Key, Operation, TestCase};

/// The seed fixtures are generated from unless told otherwise.
pub const DEFAULT_SEED: u64 = 42;

/// Shape of a randomized workload. Every operation is independently an insert
/// with probability `insert_probability`, otherwise a query. All ranges are
/// inclusive and start at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mix {
    pub insert_probability: f64,
    /// Inserted keys are drawn from `[1, max_key]`
    pub max_key: Key,
    /// Query lower bounds are drawn from `[1, max_low]`
    pub max_low: Key,
    /// Query upper bound is `low + [0, max_offset]`
    pub max_offset: Key,
}

/// 100 to 500 operations over a small key space.
pub const MID_SCALE: Mix = Mix {
    insert_probability: 0.7,
    max_key: 1_000,
    max_low: 900,
    max_offset: 200,
};

/// 1,000 to 5,000 operations.
pub const LARGE_SCALE: Mix = Mix {
    insert_probability: 0.75,
    max_key: 10_000,
    max_low: 9_000,
    max_offset: 1_000,
};

/// Fixed size stress workloads, in the order they are generated.
pub const STRESS: [(usize, Mix); 4] = [
    (
        10_000,
        Mix {
            insert_probability: 0.8,
            max_key: 100_000,
            max_low: 90_000,
            max_offset: 10_000,
        },
    ),
    (
        50_000,
        Mix {
            insert_probability: 0.8,
            max_key: 500_000,
            max_low: 450_000,
            max_offset: 50_000,
        },
    ),
    (
        100_000,
        Mix {
            insert_probability: 0.85,
            max_key: 1_000_000,
            max_low: 900_000,
            max_offset: 100_000,
        },
    ),
    (
        200_000,
        Mix {
            insert_probability: 0.7,
            max_key: 2_000_000,
            max_low: 1_800_000,
            max_offset: 200_000,
        },
    ),
];

/// Accumulates test cases, numbering them from 1 in the order they are added.
pub struct CorpusBuilder<R> {
    rng: R,
    cases: Vec<TestCase>,
}

impl<R: Rng> CorpusBuilder<R> {
    pub fn new(rng: R) -> Self {
        CorpusBuilder {
            rng,
            cases: Vec::new(),
        }
    }

    /// Appends a case with the next id.
    pub fn push(&mut self, operations: Vec<Operation>) -> &mut Self {
        let id = self.cases.len() + 1;
        debug!(id, operations = operations.len(), "added test case");
        self.cases.push(TestCase::new(id, operations));
        self
    }

    /// The ten hand written cases: single keys, disjoint clusters, duplicates,
    /// an empty structure, reversed bounds and insertion order.
    pub fn edge_cases(&mut self) -> &mut Self {
        self.push(vec![insert(10), query(5, 15)]);
        self.push(vec![insert(5), insert(10), insert(15), query(0, 20)]);
        self.push(vec![insert(100), insert(200), query(1, 50)]);
        self.push(vec![
            insert(10),
            insert(20),
            insert(30),
            query(5, 15),
            query(15, 25),
            query(25, 35),
        ]);
        self.push(vec![insert(50), insert(50), insert(50), query(40, 60)]);
        self.push(vec![query(1, 100)]);
        self.push(vec![insert(25), insert(75), query(100, 50)]);
        self.push(vec![
            insert(10),
            insert(20),
            insert(30),
            query(10, 30),
            query(11, 29),
            query(10, 10),
        ]);

        // same keys, opposite insertion order, same questions
        let probes = [query(5, 15), query(1, 20)];
        let mut ascending: Vec<Operation> = (1..=20).map(insert).collect();
        ascending.extend_from_slice(&probes);
        self.push(ascending);
        let mut descending: Vec<Operation> = (1..=20).rev().map(insert).collect();
        descending.extend_from_slice(&probes);
        self.push(descending)
    }

    /// `cases` workloads shaped by `mix`, each with a uniformly drawn length in
    /// `[min_ops, max_ops]`.
    pub fn random_mixes(&mut self, cases: usize, min_ops: usize, max_ops: usize, mix: Mix) -> &mut Self {
        for _ in 0..cases {
            let n = self.rng.gen_range(min_ops, max_ops + 1);
            let ops = self.random_mix(n, mix);
            self.push(ops);
        }
        self
    }

    /// A single workload of exactly `n` operations.
    pub fn stress(&mut self, n: usize, mix: Mix) -> &mut Self {
        let ops = self.random_mix(n, mix);
        self.push(ops)
    }

    /// 1,000 inserts over only 50 distinct keys followed by 100 narrow
    /// queries, so nearly every answer depends on counting duplicates.
    pub fn duplicate_heavy(&mut self) -> &mut Self {
        let mut ops = Vec::with_capacity(1_100);
        for _ in 0..1_000 {
            ops.push(insert(uniform(&mut self.rng, 1, 50)));
        }
        for _ in 0..100 {
            let low = uniform(&mut self.rng, 1, 40);
            let high = low + uniform(&mut self.rng, 0, 20);
            ops.push(query(low, high));
        }
        self.push(ops)
    }

    fn random_mix(&mut self, n: usize, mix: Mix) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(n);
        for _ in 0..n {
            if self.rng.gen_bool(mix.insert_probability) {
                ops.push(insert(uniform(&mut self.rng, 1, mix.max_key)));
            } else {
                let low = uniform(&mut self.rng, 1, mix.max_low);
                let high = low + uniform(&mut self.rng, 0, mix.max_offset);
                ops.push(query(low, high));
            }
        }
        ops
    }

    pub fn build(self) -> Vec<TestCase> {
        self.cases
    }
}

/// Builds the full 23 case corpus from `seed`.
pub fn build_corpus(seed: u64) -> Vec<TestCase> {
    let mut builder = CorpusBuilder::new(ChaCha8Rng::seed_from_u64(seed));
    builder
        .edge_cases()
        .random_mixes(5, 100, 500, MID_SCALE)
        .random_mixes(3, 1_000, 5_000, LARGE_SCALE)
        .duplicate_heavy();
    for &(n, mix) in STRESS.iter() {
        builder.stress(n, mix);
    }
    let corpus = builder.build();

    let total: usize = corpus.iter().map(|c| c.operations.len()).sum();
    info!(seed, cases = corpus.len(), operations = total, "built corpus");
    corpus
}

fn insert(key: Key) -> Operation {
    Operation::Insert { key }
}

fn query(low: Key, high: Key) -> Operation {
    Operation::Query { low, high }
}

// inclusive on both ends
fn uniform<R: Rng>(rng: &mut R, low: Key, high: Key) -> Key {
    rng.gen_range(low, high + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{replay, FenwickOracle};

    fn answers(case: &TestCase) -> Vec<u64> {
        replay(
            &mut FenwickOracle::with_universe(case.insert_keys()),
            &case.operations,
        )
    }

    #[test]
    fn test_corpus_shape() {
        let corpus = build_corpus(DEFAULT_SEED);
        assert_eq!(corpus.len(), 23);
        for (i, case) in corpus.iter().enumerate() {
            assert_eq!(case.id, i + 1);
        }

        for case in &corpus[10..15] {
            let n = case.operations.len();
            assert!(n >= 100 && n <= 500, "mid scale case {} has {} ops", case.id, n);
        }
        for case in &corpus[15..18] {
            let n = case.operations.len();
            assert!(n >= 1_000 && n <= 5_000, "large case {} has {} ops", case.id, n);
        }
        assert_eq!(corpus[18].operations.len(), 1_100);
        let stress: Vec<usize> = corpus[19..].iter().map(|c| c.operations.len()).collect();
        assert_eq!(stress, vec![10_000, 50_000, 100_000, 200_000]);
    }

    #[test]
    fn test_edge_case_answers() {
        let corpus = build_corpus(DEFAULT_SEED);
        let expected: Vec<Vec<u64>> = vec![
            vec![1],
            vec![3],
            vec![0],
            vec![1, 1, 1],
            vec![3],
            vec![0],
            vec![0],
            vec![3, 1, 1],
            vec![11, 20],
            vec![11, 20],
        ];
        for (case, want) in corpus.iter().zip(expected.iter()) {
            assert_eq!(&answers(case), want, "case {}", case.id);
        }
    }

    #[test]
    fn test_same_seed_same_corpus() {
        assert_eq!(build_corpus(7), build_corpus(7));
        assert_ne!(build_corpus(7)[10], build_corpus(8)[10]);
    }

    #[test]
    fn test_random_values_in_range() {
        let corpus = build_corpus(DEFAULT_SEED);
        for case in &corpus[10..15] {
            for op in &case.operations {
                match *op {
                    Operation::Insert { key } => assert!(key >= 1 && key <= 1_000),
                    Operation::Query { low, high } => {
                        assert!(low >= 1 && low <= 900);
                        assert!(high >= low && high <= low + 200);
                    }
                }
            }
        }

        let dup = &corpus[18];
        assert!(dup.operations[..1_000]
            .iter()
            .all(|op| matches!(op, Operation::Insert { key } if *key >= 1 && *key <= 50)));
        assert!(dup.operations[1_000..]
            .iter()
            .all(|op| matches!(op, Operation::Query { low, high } if *low >= 1 && *low <= 40 && *high <= *low + 20)));
    }

    #[test]
    fn test_duplicates_are_counted() {
        let corpus = build_corpus(DEFAULT_SEED);
        let dup = &corpus[18];
        // 1000 inserts into 50 keys, every query spans at least one key
        assert!(answers(dup).iter().all(|&a| a > 0));
        let full = Operation::Query { low: 1, high: 50 };
        let mut ops = dup.operations.clone();
        ops.push(full);
        let all = replay(&mut FenwickOracle::with_universe(dup.insert_keys()), &ops);
        assert_eq!(*all.last().unwrap(), 1_000);
    }

    #[test]
    fn test_builder_numbers_sequentially() {
        let mut builder = CorpusBuilder::new(ChaCha8Rng::seed_from_u64(1));
        builder.push(vec![]).stress(10, MID_SCALE).push(vec![insert(1)]);
        let cases = builder.build();
        let ids: Vec<usize> = cases.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(cases[1].operations.len(), 10);
    }
}
