//! Partition-quality metrics for one mesh shard.
//!
//! Quick diagnostics of how well the mesh was partitioned: point/element
//! totals, ghost and halo counts, inter-process neighbor fan-out, and the
//! size of the adjacency sparsity pattern. Intended for debugging and
//! post-run analysis of partition quality, not for steering the solver.

use itertools::Itertools;

use crate::error::HelmError;
use crate::mesh::shard::{MarkerKind, MeshShard, TransferDirection};

/// Quoted CSV header; column order matches [`PartitionMetrics::csv_row`].
pub const REPORT_HEADER: &str = "\"Rank\", \"nNeighbors\", \"nPointTotal\", \"nEdge\", \"nPointGhost\", \"nSendTotal\", \"nRecvTotal\", \"nElemTotal\", \"nElemBoundary\", \"nElemHalo\", \"nnz\"";

/// Partition-quality metrics of a single shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartitionMetrics {
    /// Transfer-marker pairs, one per neighboring process.
    pub n_neighbors: u64,
    pub n_point_total: u64,
    pub n_edge: u64,
    /// Points whose owner is another process.
    pub n_point_ghost: u64,
    /// Vertices sent across all transfer pairs.
    pub n_send_total: u64,
    /// Vertices received across all transfer pairs.
    pub n_recv_total: u64,
    pub n_elem_total: u64,
    /// Boundary elements summed over all markers.
    pub n_elem_bound: u64,
    /// Elements touching at least one ghost point.
    pub n_elem_halo: u64,
    /// Nonzeros of the point-adjacency pattern, diagonal included.
    pub nnz: u64,
}

impl PartitionMetrics {
    /// Computes all metrics from the local shard alone.
    ///
    /// Shard invariants are validated first, so a malformed shard (element
    /// node out of range, unpaired transfer marker) is reported as an error
    /// rather than panicking mid-scan. Transfer pairs are scanned in marker
    /// order: each send marker and its receive partner at the next index
    /// count one neighbor and contribute both directions' vertex counts.
    pub fn measure(shard: &MeshShard) -> Result<Self, HelmError> {
        shard.validate()?;
        let mut metrics = PartitionMetrics {
            n_point_total: shard.n_points(),
            n_point_ghost: shard.n_points() - shard.n_points_domain(),
            n_elem_total: shard.n_elems(),
            n_edge: shard.n_edges,
            ..Default::default()
        };

        for (i, marker) in shard.markers.iter().enumerate() {
            metrics.n_elem_bound += marker.n_elems;
            if let MarkerKind::Transfer {
                direction: TransferDirection::Send,
                n_vertices: n_send,
                ..
            } = marker.kind
            {
                let recv = shard
                    .markers
                    .get(i + 1)
                    .and_then(|m| match m.kind {
                        MarkerKind::Transfer {
                            direction: TransferDirection::Recv,
                            n_vertices,
                            ..
                        } => Some(n_vertices),
                        _ => None,
                    })
                    .ok_or(HelmError::UnpairedTransferMarker { index: i })?;
                metrics.n_neighbors += 1;
                metrics.n_send_total += n_send;
                metrics.n_recv_total += recv;
            }
        }

        // An element is halo when any of its nodes is not domain-owned.
        let is_halo: Vec<bool> = shard
            .elems
            .iter()
            .map(|elem| elem.nodes.iter().any(|&n| !shard.points[n].owned))
            .collect();
        metrics.n_elem_halo = is_halo.iter().filter(|&&h| h).count() as u64;

        metrics.nnz = adjacency_nnz(shard);

        Ok(metrics)
    }

    /// Renders this shard's report row for `rank`; column order matches
    /// [`REPORT_HEADER`].
    pub fn csv_row(&self, rank: usize) -> String {
        [
            rank as u64,
            self.n_neighbors,
            self.n_point_total,
            self.n_edge,
            self.n_point_ghost,
            self.n_send_total,
            self.n_recv_total,
            self.n_elem_total,
            self.n_elem_bound,
            self.n_elem_halo,
            self.nnz,
        ]
        .iter()
        .join(", ")
    }
}

/// Total nonzero count of the point-adjacency sparsity pattern.
///
/// Builds the CSR row-pointer prefix sum over per-point row widths
/// (degree + 1 for the diagonal) and keeps only the final scalar. The
/// row-pointer array is scratch: the sparsity structure actually used by a
/// linear solver belongs to that solver, not to this diagnostic.
fn adjacency_nnz(shard: &MeshShard) -> u64 {
    let mut row_ptr = vec![0u64; shard.points.len() + 1];
    for (i, point) in shard.points.iter().enumerate() {
        row_ptr[i + 1] = row_ptr[i] + (point.degree as u64 + 1);
    }
    row_ptr[shard.points.len()]
}
