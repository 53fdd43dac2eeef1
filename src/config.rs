//! Settings for a generation run.

use std::path::PathBuf;

use tracing::info;

use crate::corpus::{build_corpus, DEFAULT_SEED};
use crate::error::Result;
use crate::fixture::{write_all, FixtureSummary};

/// Where fixtures go, which seed they come from and how many threads write
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub out_dir: PathBuf,
    pub seed: u64,
    /// Worker threads used to write fixtures. Does not affect their contents.
    pub jobs: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            out_dir: PathBuf::from("."),
            seed: DEFAULT_SEED,
            jobs: num_cpus::get(),
        }
    }
}

impl GeneratorConfig {
    /// Builds the corpus for `self.seed` and writes every fixture pair into
    /// `self.out_dir`.
    pub fn run(&self) -> Result<Vec<FixtureSummary>> {
        info!(out_dir = %self.out_dir.display(), seed = self.seed, jobs = self.jobs, "generating fixtures");
        let corpus = build_corpus(self.seed);
        write_all(&self.out_dir, corpus, self.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.out_dir, PathBuf::from("."));
        assert_eq!(config.seed, 42);
        assert!(config.jobs >= 1);
    }
}
