//! Collective ordered append: rank-serialized writes to one shared artifact.
//!
//! The report file is shared by every process in the group, yet no lock
//! primitive protects it. Mutual exclusion is structural: the master rank
//! writes the header alone, then ranks take strict round-robin turns — on
//! turn `r` only rank `r` opens the artifact in append mode, writes its one
//! row whole, and closes it, and every rank (idle ones included) waits at a
//! barrier before the next turn. At most one process is ever inside a write
//! window between two barriers, so rows land in ascending rank order.
//!
//! Environmental precondition: an append must be visible to all processes by
//! the time the barrier after it returns. On storage without that guarantee
//! rows may appear out of order; the protocol cannot enforce it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::HelmError;
use crate::group::ProcessGroup;

/// Destination of the shared report artifact.
///
/// Each call opens and closes the artifact; a row is written whole or not at
/// all. Implementations must not buffer across calls, or the visibility
/// precondition above is broken.
pub trait ReportSink {
    /// Create or truncate the artifact and write the header line.
    fn write_header(&self, header: &str) -> Result<(), HelmError>;
    /// Append one whole row.
    fn append_row(&self, row: &str) -> Result<(), HelmError>;
}

/// Runs the ordered-append protocol for this process's `row`.
///
/// Every member of the group must call this collectively. An `Err` on the
/// responsible rank leaves the other ranks blocked at the next barrier, so
/// production callers must escalate it to a whole-group abort rather than
/// returning up the stack (see
/// [`write_partition_report_or_abort`](crate::report::write_partition_report_or_abort)).
pub fn collective_ordered_append<G, S>(
    group: &G,
    sink: &S,
    header: &str,
    row: &str,
) -> Result<(), HelmError>
where
    G: ProcessGroup + ?Sized,
    S: ReportSink + ?Sized,
{
    if group.is_master() {
        sink.write_header(header)?;
    }
    group.barrier();

    for turn in 0..group.size() {
        if group.rank() == turn {
            sink.append_row(row)?;
        }
        group.barrier();
    }
    Ok(())
}

/// File-backed sink: truncates for the header, opens in append mode per row.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFileSink { path: path.into() }
    }

    fn report_io(&self, err: std::io::Error) -> HelmError {
        HelmError::ReportIo {
            message: format!("{}: {err}", self.path.display()),
        }
    }
}

impl ReportSink for CsvFileSink {
    fn write_header(&self, header: &str) -> Result<(), HelmError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.report_io(e))?;
        writeln!(file, "{header}").map_err(|e| self.report_io(e))
    }

    fn append_row(&self, row: &str) -> Result<(), HelmError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.report_io(e))?;
        writeln!(file, "{row}").map_err(|e| self.report_io(e))
    }
}

/// In-memory sink recording lines in arrival order, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, in the order they arrived.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl ReportSink for MemorySink {
    fn write_header(&self, header: &str) -> Result<(), HelmError> {
        let mut lines = self.lines.lock();
        lines.clear();
        lines.push(header.to_string());
        Ok(())
    }

    fn append_row(&self, row: &str) -> Result<(), HelmError> {
        self.lines.lock().push(row.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{LocalGroup, SoloGroup};
    use serial_test::serial;
    use std::sync::Arc;

    #[test]
    fn solo_group_writes_header_then_row() {
        let sink = MemorySink::new();
        collective_ordered_append(&SoloGroup, &sink, "\"Rank\"", "0").unwrap();
        assert_eq!(sink.lines(), vec!["\"Rank\"".to_string(), "0".to_string()]);
    }

    #[test]
    fn rows_arrive_in_rank_order_despite_timing() {
        let sink = Arc::new(MemorySink::new());
        let members = LocalGroup::split(3);
        let handles: Vec<_> = members
            .into_iter()
            .map(|group| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    // Later ranks finish their "local work" first.
                    std::thread::sleep(std::time::Duration::from_millis(
                        (20 * (3 - group.rank())) as u64,
                    ));
                    let row = format!("{}", group.rank());
                    collective_ordered_append(&group, sink.as_ref(), "hdr", &row).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.lines(), vec!["hdr", "0", "1", "2"]);
    }

    #[test]
    #[serial]
    fn csv_file_sink_truncates_and_appends() {
        let path = std::env::temp_dir().join(format!("mesh_helm_sink_{}.csv", std::process::id()));
        let sink = CsvFileSink::new(&path);
        sink.write_header("h1").unwrap();
        sink.append_row("a").unwrap();
        sink.write_header("h2").unwrap();
        sink.append_row("b").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "h2\nb\n");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn append_without_artifact_is_an_error() {
        let sink = CsvFileSink::new("/no/such/dir/partitioning.csv");
        let err = sink.append_row("0").unwrap_err();
        assert!(matches!(err, HelmError::ReportIo { .. }));
    }
}
