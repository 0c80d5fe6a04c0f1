//! Partition diagnostics: per-process metrics, one globally ordered report.
//!
//! Every process measures its own shard, then all of them cooperate to emit
//! one CSV artifact with the header written exactly once and one row per
//! rank, in ascending rank order, with no central coordinator.

pub mod ordered_append;
pub mod partition;

pub use ordered_append::{CsvFileSink, MemorySink, ReportSink, collective_ordered_append};
pub use partition::{PartitionMetrics, REPORT_HEADER};

use crate::error::HelmError;
use crate::group::{ProcessGroup, collective_abort};
use crate::mesh::shard::MeshShard;

/// Measures the local shard and runs the ordered-append protocol.
///
/// Collective: every member of `group` must call this with its own shard and
/// a sink naming the same shared artifact. Testable with fake groups and
/// sinks; see [`write_partition_report_or_abort`] for the production wrapper.
pub fn write_partition_report<G, S>(
    group: &G,
    shard: &MeshShard,
    sink: &S,
) -> Result<(), HelmError>
where
    G: ProcessGroup + ?Sized,
    S: ReportSink + ?Sized,
{
    let metrics = PartitionMetrics::measure(shard)?;
    let row = metrics.csv_row(group.rank());
    collective_ordered_append(group, sink, REPORT_HEADER, &row)
}

/// Production entry point: any failure aborts the whole group.
///
/// A rank that failed its write turn and simply returned would leave every
/// other rank blocked at the next barrier, so the error is escalated to a
/// collective abort instead.
pub fn write_partition_report_or_abort<G, S>(group: &G, shard: &MeshShard, sink: &S)
where
    G: ProcessGroup + ?Sized,
    S: ReportSink + ?Sized,
{
    if let Err(err) = write_partition_report(group, shard, sink) {
        collective_abort(group, &err);
    }
}
