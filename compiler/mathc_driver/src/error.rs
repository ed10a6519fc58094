//! Driver errors.

use std::path::PathBuf;

use mathc_ir::InternError;

/// Everything that stops a build.
///
/// Resolution problems and codegen diagnostics are not errors here: they
/// travel in `BuildOutcome` and the C file is still written.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Reading the tree file or writing the output failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tree file is not a bincode `TreeFile`.
    #[error("{}: not a valid tree file: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    /// The tree file's name table could not be restored.
    #[error("{}: corrupt name table: {source}", path.display())]
    Names {
        path: PathBuf,
        #[source]
        source: InternError,
    },

    /// Bad command line.
    #[error("{0}")]
    Usage(String),

    /// The C compiler could not be started or rejected the output.
    #[error("`{cc}` failed: {message}")]
    Toolchain { cc: String, message: String },
}

impl DriverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }
}
