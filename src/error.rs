//! Error types for generating and verifying fixtures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout `rangefix`.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while writing or reading fixtures. All of
/// these are fatal: a half written fixture directory is worse than none.
#[derive(Debug, Error)]
pub enum Error {
    /// The output directory could not be created.
    #[error("cannot create output directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `.dat` or `.ans` file could not be written.
    #[error("cannot write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A fixture file or directory could not be read.
    #[error("cannot read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A fixture file is not a valid token stream.
    #[error("malformed fixture {path}")]
    Malformed { path: PathBuf },

    /// A writer thread panicked before reporting back.
    #[error("fixture worker panicked")]
    WorkerPanicked,
}
