//! Mesh header scanning: zone count and spatial dimension without a full
//! parse.
//!
//! # Supported formats
//! - Native tagged text: header lines of the form `KEYWORD=value`. Only the
//!   first 10 lines are examined; `NZONE=` yields the zone count (default 1)
//!   and `NDIME=` the spatial dimension (default 3).
//! - Structured binary: queried through the [`StructuredMeta`] collaborator;
//!   only metadata is touched, never the mesh payload.
//!
//! # Limitations
//! - The 10-line window is fixed. A keyword appearing on line 11 or later is
//!   silently ignored and the default is returned. Existing inputs depend on
//!   this exact behavior.
//! - Zone count is not extracted from structured files; that is left to the
//!   mesh loader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::{MeshFormat, ProblemDescriptor, UnsteadyMode};
use crate::error::HelmError;

/// Keyword for the zone count in native headers.
const ZONE_KEYWORD: &str = "NZONE=";
/// Keyword for the spatial dimension in native headers.
const DIM_KEYWORD: &str = "NDIME=";
/// Header lines examined before giving up on a keyword.
const HEADER_SCAN_LINES: usize = 10;

/// Metadata of one top-level database in a structured mesh file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMeta {
    pub name: String,
    /// Cell dimensionality, used as the spatial dimension of the problem.
    pub cell_dim: usize,
    pub n_zones: usize,
}

/// Metadata query API of the structured binary mesh format.
///
/// Implemented by the external format bindings; this crate consumes only
/// these queries. Tests substitute in-memory fakes.
pub trait StructuredMeta {
    /// Whether the file is a valid instance of the format.
    fn is_valid(&self, path: &Path) -> bool;
    /// Number of top-level databases in the file.
    fn database_count(&self, path: &Path) -> Result<usize, String>;
    /// Read the metadata of database `index` (0-based).
    fn database(&self, path: &Path, index: usize) -> Result<DatabaseMeta, String>;
}

/// Result of a header scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHeader {
    pub n_zones: usize,
    pub n_dim: usize,
}

/// Scans mesh headers for zone count and spatial dimension.
///
/// Structured-format scans need a [`StructuredMeta`] collaborator; a scanner
/// built with [`HeaderScanner::new`] handles only the native text format.
#[derive(Default)]
pub struct HeaderScanner<'a> {
    meta: Option<&'a dyn StructuredMeta>,
}

impl<'a> HeaderScanner<'a> {
    /// Scanner for native text headers only.
    pub fn new() -> Self {
        HeaderScanner { meta: None }
    }

    /// Scanner that can also query structured files via `meta`.
    pub fn with_structured(meta: &'a dyn StructuredMeta) -> Self {
        HeaderScanner { meta: Some(meta) }
    }

    /// Zone count declared by the mesh file, after the time-spectral override.
    ///
    /// In time-spectral mode the zones are synthetic one-per-time-instance
    /// decompositions, so the descriptor's instance count wins over anything
    /// the file declares. Structured files always report the default here.
    pub fn zone_count(
        &self,
        path: &Path,
        format: MeshFormat,
        descriptor: &ProblemDescriptor,
    ) -> Result<usize, HelmError> {
        let mut n_zones = match format {
            MeshFormat::Native => self
                .scan_native_keyword(path, ZONE_KEYWORD)?
                .unwrap_or(1),
            // Left to the mesh loader for structured files.
            MeshFormat::Structured => 1,
        };
        if descriptor.unsteady == UnsteadyMode::TimeSpectral {
            n_zones = descriptor.n_time_instances;
        }
        log::debug!("header scan: {} zones in {}", n_zones, path.display());
        Ok(n_zones)
    }

    /// Spatial dimension declared by the mesh file.
    pub fn dimension(&self, path: &Path, format: MeshFormat) -> Result<usize, HelmError> {
        let n_dim = match format {
            MeshFormat::Native => self
                .scan_native_keyword(path, DIM_KEYWORD)?
                .unwrap_or(3),
            MeshFormat::Structured => self.structured_dimension(path)?,
        };
        log::debug!("header scan: dimension {} in {}", n_dim, path.display());
        Ok(n_dim)
    }

    /// Composes [`Self::zone_count`] and [`Self::dimension`].
    pub fn scan(
        &self,
        path: &Path,
        format: MeshFormat,
        descriptor: &ProblemDescriptor,
    ) -> Result<MeshHeader, HelmError> {
        Ok(MeshHeader {
            n_zones: self.zone_count(path, format, descriptor)?,
            n_dim: self.dimension(path, format)?,
        })
    }

    /// Production entry point: any scan failure aborts the whole group.
    ///
    /// Dimensioning is required before any allocation proceeds on any
    /// process, and a process exiting alone would leave its peers hanging at
    /// the next collective, so header-scan failures are escalated to a
    /// group-wide abort.
    pub fn scan_or_abort<G: crate::group::ProcessGroup + ?Sized>(
        &self,
        group: &G,
        path: &Path,
        format: MeshFormat,
        descriptor: &ProblemDescriptor,
    ) -> MeshHeader {
        match self.scan(path, format, descriptor) {
            Ok(header) => header,
            Err(err) => crate::group::collective_abort(group, &err),
        }
    }

    /// Scan the first [`HEADER_SCAN_LINES`] lines for `keyword` and parse the
    /// trailing integer. The last occurrence within the window wins.
    fn scan_native_keyword(
        &self,
        path: &Path,
        keyword: &'static str,
    ) -> Result<Option<usize>, HelmError> {
        let file = File::open(path).map_err(|e| HelmError::io(path, e))?;
        let reader = BufReader::new(file);
        let mut value = None;
        for line in reader.lines().take(HEADER_SCAN_LINES) {
            let line = line.map_err(|e| HelmError::io(path, e))?;
            if let Some(pos) = line.find(keyword) {
                let token = line[pos + keyword.len()..].trim();
                let parsed = token.parse::<usize>().map_err(|_| HelmError::HeaderParse {
                    path: path.to_path_buf(),
                    keyword,
                    token: token.to_string(),
                })?;
                value = Some(parsed);
            }
        }
        Ok(value)
    }

    fn structured_dimension(&self, path: &Path) -> Result<usize, HelmError> {
        let meta = self
            .meta
            .ok_or_else(|| HelmError::StructuredMetaUnavailable {
                path: path.to_path_buf(),
            })?;
        if !meta.is_valid(path) {
            return Err(HelmError::NotStructured {
                path: path.to_path_buf(),
            });
        }
        let n_bases = meta
            .database_count(path)
            .map_err(|message| HelmError::StructuredMeta {
                path: path.to_path_buf(),
                message,
            })?;
        // One database only; anything else is an unsupported input, not a
        // truncation.
        if n_bases > 1 {
            return Err(HelmError::MultipleDatabases {
                path: path.to_path_buf(),
                found: n_bases,
            });
        }
        let base = meta
            .database(path, 0)
            .map_err(|message| HelmError::StructuredMeta {
                path: path.to_path_buf(),
                message,
            })?;
        Ok(base.cell_dim)
    }
}
