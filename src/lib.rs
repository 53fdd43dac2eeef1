//! `rangefix` generates golden fixtures for data structures that support
//! inserting keys (duplicates allowed) and counting the keys that fall in an
//! inclusive range.
//!
//! # Fixtures
//!
//! Every test case becomes a pair of files named after its three digit id:
//!
//! - `NNN.dat`: the operations, `k <key>` for an insert and `q <low> <high>`
//!   for a query, joined by single spaces on one line.
//! - `NNN.ans`: one count per query, in query order, joined by single spaces.
//!   A case without queries has an empty `.ans` file.
//!
//! A query with `low > high` always counts `0`, and a key inserted several
//! times is counted once per insert.
//!
//! # Corpus
//!
//! The corpus is ten hand written edge cases followed by randomized workloads
//! of growing size, up to 200,000 operations. All randomness comes from one
//! seeded ChaCha generator, so regenerating with the same seed produces byte
//! identical files.
//!
//! # Example
//!
//! ```no_run
//! use rangefix::config::GeneratorConfig;
//!
//! let config = GeneratorConfig {
//!     out_dir: "fixtures".into(),
//!     ..GeneratorConfig::default()
//! };
//! for summary in config.run().unwrap() {
//!     println!("{:03}: {} operations", summary.id, summary.operations);
//! }
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod fixture;
pub mod operation;
pub mod oracle;
pub mod parsers;

pub use error::{Error, Result};
