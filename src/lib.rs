//! # mesh-helm
//!
//! mesh-helm is the orchestration layer of a distributed-memory multi-physics
//! PDE solver. From a small set of problem descriptors it decides which
//! execution strategy ("driver") governs a run, and it provides a diagnostic
//! subsystem that analyzes the quality of a distributed mesh partition across
//! a group of cooperating processes.
//!
//! ## Components
//! - **Header scanning** ([`mesh::header`]): zone count and spatial dimension
//!   from a mesh description without loading the full mesh.
//! - **Driver selection** ([`driver`]): a priority-ordered, total dispatch
//!   over (zone count, time-integration mode, coupling flag) to one of four
//!   strategies.
//! - **Partition diagnostics** ([`report`]): per-process partition-quality
//!   metrics emitted as a single rank-ordered CSV report through a
//!   barrier-serialized append protocol, with no central coordinator and no
//!   lock primitive.
//!
//! ## Process model
//! All collective behavior goes through the [`group::ProcessGroup`] trait:
//! serial runs use [`group::SoloGroup`], tests use the thread-backed
//! [`group::LocalGroup`], and distributed runs use `MpiGroup` behind the
//! `mpi-support` feature. Unrecoverable input errors terminate the whole
//! group, never a single process.
//!
//! Mesh loading, configuration parsing, the numerical solvers, and process
//! bootstrap are external collaborators; this crate consumes them only at
//! their interface boundaries.

pub mod config;
pub mod driver;
pub mod error;
pub mod group;
pub mod mesh;
pub mod report;

/// A convenient prelude to import the most-used traits & types.
pub mod prelude {
    pub use crate::config::{MeshFormat, ProblemDescriptor, UnsteadyMode};
    pub use crate::driver::{Driver, DriverInputs, DriverKind, build_driver, select_driver};
    pub use crate::error::HelmError;
    #[cfg(feature = "mpi-support")]
    pub use crate::group::MpiGroup;
    pub use crate::group::{LocalGroup, ProcessGroup, SoloGroup, collective_abort};
    pub use crate::mesh::header::{HeaderScanner, MeshHeader, StructuredMeta};
    pub use crate::mesh::shard::{
        Element, GridPoint, Marker, MarkerKind, MeshShard, TransferDirection,
    };
    pub use crate::report::{
        CsvFileSink, MemorySink, PartitionMetrics, REPORT_HEADER, ReportSink,
        collective_ordered_append, write_partition_report, write_partition_report_or_abort,
    };
}
