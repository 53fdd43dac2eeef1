//! The instructions a fixture is made of.

use std::fmt;

/// A key stored by the structure under test.
pub type Key = i64;

/// A single instruction for the structure under test.
///
/// Any pair of bounds is a valid `Query`, including `low > high`; what such a
/// query answers is decided by the oracle, not here.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Operation {
    /// Insert one occurrence of `key`
    Insert { key: Key },
    /// Count the occurrences of keys in `[low, high]`
    Query { low: Key, high: Key },
}

/// Renders the operation in the fixture token format:
/// `k <key>` for inserts and `q <low> <high>` for queries.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Insert { key } => write!(f, "k {}", key),
            Operation::Query { low, high } => write!(f, "q {} {}", low, high),
        }
    }
}

/// A numbered sequence of operations, written out as one `.dat`/`.ans` pair.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TestCase {
    pub id: usize,
    pub operations: Vec<Operation>,
}

impl TestCase {
    pub fn new(id: usize, operations: Vec<Operation>) -> Self {
        TestCase { id, operations }
    }

    /// The stem shared by this case's fixture files, e.g. `007`.
    pub fn file_stem(&self) -> String {
        file_stem(self.id)
    }

    /// Number of queries, which is also the number of expected answers.
    pub fn query_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Query { .. }))
            .count()
    }

    /// Every inserted key in operation order, duplicates included.
    pub fn insert_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.operations.iter().filter_map(|op| match op {
            Operation::Insert { key } => Some(*key),
            Operation::Query { .. } => None,
        })
    }
}

/// Zero padded, three digit file stem for a test case id.
pub fn file_stem(id: usize) -> String {
    format!("{:03}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Insert { key: 10 }.to_string(), "k 10");
        assert_eq!(Operation::Insert { key: -3 }.to_string(), "k -3");
        assert_eq!(
            Operation::Query { low: 100, high: 50 }.to_string(),
            "q 100 50"
        );
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(7), "007");
        assert_eq!(file_stem(23), "023");
        assert_eq!(file_stem(1234), "1234");
        assert_eq!(TestCase::new(1, vec![]).file_stem(), "001");
    }

    #[test]
    fn test_counts_and_keys() {
        let case = TestCase::new(
            5,
            vec![
                Operation::Insert { key: 50 },
                Operation::Query { low: 1, high: 2 },
                Operation::Insert { key: 50 },
                Operation::Insert { key: 7 },
                Operation::Query { low: 40, high: 60 },
            ],
        );
        assert_eq!(case.query_count(), 2);
        assert_eq!(case.insert_keys().collect::<Vec<_>>(), vec![50, 50, 7]);

        let only_queries = TestCase::new(6, vec![Operation::Query { low: 1, high: 100 }]);
        assert_eq!(only_queries.query_count(), 1);
        assert_eq!(only_queries.insert_keys().count(), 0);
    }
}
