//! Turns test cases into `.dat`/`.ans` file pairs, and checks existing pairs.
//!
//! A `.dat` file is every operation of a case rendered as `k <key>` or
//! `q <low> <high>`, joined by single spaces on one line. The matching `.ans`
//! file holds one answer per query, also space separated, and is empty when
//! the case has no queries. Neither file ends with a newline.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::operation::{file_stem, Operation, TestCase};
use crate::oracle::{replay, FenwickOracle};
use crate::parsers::{parse_answers, parse_operations};

/// What was written for one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSummary {
    pub id: usize,
    pub operations: usize,
    pub queries: usize,
}

/// Path of the input file for `id` inside `dir`.
pub fn dat_path(dir: &Path, id: usize) -> PathBuf {
    dir.join(format!("{}.dat", file_stem(id)))
}

/// Path of the expected answer file for `id` inside `dir`.
pub fn ans_path(dir: &Path, id: usize) -> PathBuf {
    dir.join(format!("{}.ans", file_stem(id)))
}

/// Replays `operations` through a fresh oracle and returns its answers.
pub fn expected_answers(operations: &[Operation]) -> Vec<u64> {
    let keys = operations.iter().filter_map(|op| match op {
        Operation::Insert { key } => Some(*key),
        Operation::Query { .. } => None,
    });
    replay(&mut FenwickOracle::with_universe(keys), operations)
}

/// Renders operations as a single line token stream.
pub fn render_operations(operations: &[Operation]) -> String {
    join(operations)
}

/// Renders answers as a single line; empty when there are none.
pub fn render_answers(answers: &[u64]) -> String {
    join(answers)
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    let mut out = String::with_capacity(items.len() * 8);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // writing into a String cannot fail
        let _ = write!(out, "{}", item);
    }
    out
}

/// Writes the `.dat`/`.ans` pair for one case into `dir`, which must exist.
pub fn write_fixture(dir: &Path, case: &TestCase) -> Result<FixtureSummary> {
    let answers = expected_answers(&case.operations);
    debug_assert_eq!(answers.len(), case.query_count());

    write_file(&dat_path(dir, case.id), render_operations(&case.operations))?;
    write_file(&ans_path(dir, case.id), render_answers(&answers))?;

    debug!(id = case.id, operations = case.operations.len(), queries = answers.len(), "wrote fixture");
    Ok(FixtureSummary {
        id: case.id,
        operations: case.operations.len(),
        queries: answers.len(),
    })
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_owned(),
        source,
    })
}

/// Writes every case into `dir` (created if missing) using up to `jobs`
/// threads. The returned summaries are sorted by id, and the files written do
/// not depend on `jobs`.
pub fn write_all(dir: &Path, cases: Vec<TestCase>, jobs: usize) -> Result<Vec<FixtureSummary>> {
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_owned(),
        source,
    })?;

    let jobs = jobs.max(1).min(cases.len().max(1));
    let summaries = if jobs == 1 {
        let mut summaries = cases
            .iter()
            .map(|case| write_fixture(dir, case))
            .collect::<Result<Vec<_>>>()?;
        summaries.sort_by_key(|s| s.id);
        summaries
    } else {
        write_parallel(dir, cases, jobs)?
    };

    info!(dir = %dir.display(), fixtures = summaries.len(), "wrote fixtures");
    Ok(summaries)
}

// Deals cases round robin so the big stress cases at the end of the corpus
// land on different workers.
fn write_parallel(dir: &Path, cases: Vec<TestCase>, jobs: usize) -> Result<Vec<FixtureSummary>> {
    let total = cases.len();
    let mut work: Vec<Vec<TestCase>> = (0..jobs).map(|_| Vec::new()).collect();
    for (i, case) in cases.into_iter().enumerate() {
        work[i % jobs].push(case);
    }

    let mut threads = Vec::with_capacity(jobs);
    for chunk in work {
        let dir = dir.to_owned();
        threads.push(thread::spawn(move || {
            chunk
                .iter()
                .map(|case| write_fixture(&dir, case))
                .collect::<Result<Vec<_>>>()
        }));
    }

    let mut summaries = Vec::with_capacity(total);
    for t in threads {
        let mut partial = t.join().map_err(|_| Error::WorkerPanicked)??;
        summaries.append(&mut partial);
    }
    summaries.sort_by_key(|s| s.id);
    Ok(summaries)
}

/// The outcome of re-checking one fixture pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub id: usize,
    pub operations: usize,
    /// Answers read from the `.ans` file
    pub expected: Vec<u64>,
    /// Answers the oracle gives for the `.dat` file
    pub actual: Vec<u64>,
}

impl Verification {
    pub fn is_ok(&self) -> bool {
        self.expected == self.actual
    }

    /// Index of the first answer that differs, if any. A length difference
    /// counts as differing at the shorter length.
    pub fn first_mismatch(&self) -> Option<usize> {
        if self.is_ok() {
            return None;
        }
        let n = self.expected.len().min(self.actual.len());
        Some(
            (0..n)
                .find(|&i| self.expected[i] != self.actual[i])
                .unwrap_or(n),
        )
    }
}

/// Re-derives the answers for fixture `id` in `dir` and compares them with
/// its `.ans` file.
pub fn verify_fixture(dir: &Path, id: usize) -> Result<Verification> {
    let dat = dat_path(dir, id);
    let ans = ans_path(dir, id);
    let operations = parse_operations(&read_file(&dat)?).ok_or(Error::Malformed { path: dat })?;
    let expected = parse_answers(&read_file(&ans)?).ok_or(Error::Malformed { path: ans })?;
    let actual = expected_answers(&operations);

    let verification = Verification {
        id,
        operations: operations.len(),
        expected,
        actual,
    };
    match verification.first_mismatch() {
        None => debug!(id, "fixture ok"),
        Some(index) => warn!(id, index, "fixture answers differ from oracle"),
    }
    Ok(verification)
}

/// Verifies every fixture in `dir`: each `NNN.dat` whose stem is a number and
/// that has a sibling `NNN.ans`. Results are in ascending id order.
pub fn verify_dir(dir: &Path) -> Result<Vec<Verification>> {
    let read_err = |source: std::io::Error| Error::Read {
        path: dir.to_owned(),
        source,
    };
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.extension().map_or(true, |ext| ext != "dat") {
            continue;
        }
        // only canonical stems, so `7.dat` is not mistaken for `007.dat`
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<usize>().ok().filter(|&id| file_stem(id) == s));
        if let Some(id) = id {
            if ans_path(dir, id).is_file() {
                ids.push(id);
            }
        }
    }
    ids.sort_unstable();

    let results = ids
        .into_iter()
        .map(|id| verify_fixture(dir, id))
        .collect::<Result<Vec<_>>>()?;
    info!(dir = %dir.display(), fixtures = results.len(), "verified fixtures");
    Ok(results)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Read {
        path: path.to_owned(),
        source,
    })
}
