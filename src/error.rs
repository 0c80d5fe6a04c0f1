//! `HelmError`: unified error type for mesh-helm public APIs.
//!
//! Every fallible public operation in this crate reports through this enum so
//! callers get non-panicking error handling with enough context (file path,
//! detected condition) to fix the offending input. None of these conditions
//! is recoverable by retry; production entry points convert them into a
//! collective abort of the whole process group (see [`crate::group`]).

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for mesh-helm operations.
#[derive(Debug, Error)]
pub enum HelmError {
    /// The mesh file could not be opened or read.
    #[error("cannot read mesh file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A recognized header keyword carried a value that is not an integer.
    #[error("malformed header in `{path}`: `{keyword}` value `{token}` is not an integer")]
    HeaderParse {
        path: PathBuf,
        keyword: &'static str,
        token: String,
    },
    /// The file is not a valid instance of the declared structured format.
    #[error("`{path}` is not a valid structured mesh file")]
    NotStructured { path: PathBuf },
    /// Structured files with more than one top-level database are unsupported.
    #[error("structured mesh file `{path}` contains {found} databases; only 1 is supported")]
    MultipleDatabases { path: PathBuf, found: usize },
    /// A structured-format scan was requested without a metadata collaborator.
    #[error("no structured-format metadata source was supplied for `{path}`")]
    StructuredMetaUnavailable { path: PathBuf },
    /// The structured metadata API itself failed.
    #[error("structured metadata query failed for `{path}`: {message}")]
    StructuredMeta { path: PathBuf, message: String },
    /// FSI coupling requires exactly two zones at driver construction.
    #[error("FSI driver requires exactly 2 zones, got {n_zones}")]
    FsiZoneCount { n_zones: usize },
    /// An element references a node index outside the shard's point range.
    #[error("element {elem} references node {node} but the shard has only {n_points} points")]
    NodeOutOfRange {
        elem: usize,
        node: usize,
        n_points: usize,
    },
    /// A transfer send marker is not immediately followed by its recv partner.
    #[error("transfer marker {index} has no adjacent receive partner")]
    UnpairedTransferMarker { index: usize },
    /// The shared report artifact could not be written.
    #[error("cannot write partition report: {message}")]
    ReportIo { message: String },
}

impl HelmError {
    /// Wraps an I/O failure with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HelmError::Io {
            path: path.into(),
            source,
        }
    }
}
