//! Ghost-aware local mesh shard.
//!
//! Each process exclusively owns one [`MeshShard`]: its partition of the
//! distributed mesh, augmented with ghost (halo) copies of points owned by
//! neighboring processes. A point's `owned` flag is authoritative; ghost
//! status is not encoded anywhere else. Inter-process exchange is described
//! by transfer markers, which are always allocated as adjacent pairs: a send
//! marker immediately followed by its receive counterpart, each carrying the
//! vertex count for that direction (the two counts may differ — asymmetric
//! halo widths are allowed).

use crate::error::HelmError;
use serde::{Deserialize, Serialize};

/// Geometric vertex of the shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Globally unique identity across the whole distributed mesh.
    pub global: u64,
    /// `false` means this is a ghost/halo copy owned by another process.
    pub owned: bool,
    /// Number of directly connected points.
    pub degree: usize,
}

/// A cell, referencing points by shard-local index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub nodes: Vec<usize>,
}

/// Direction of one half of a transfer-marker pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    Send,
    Recv,
}

/// Classification of a boundary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Ordinary physical boundary patch.
    Physical,
    /// One direction of an inter-process exchange with `peer`.
    Transfer {
        peer: usize,
        direction: TransferDirection,
        n_vertices: u64,
    },
}

/// Named group of boundary elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub tag: String,
    pub n_elems: u64,
    pub kind: MarkerKind,
}

impl Marker {
    /// Whether this marker is the send half of a transfer pair.
    pub fn is_transfer_send(&self) -> bool {
        matches!(
            self.kind,
            MarkerKind::Transfer {
                direction: TransferDirection::Send,
                ..
            }
        )
    }
}

/// One process's partition of the distributed mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshShard {
    pub points: Vec<GridPoint>,
    pub elems: Vec<Element>,
    /// Markers in allocation order; transfer pairs are adjacent (send, recv).
    pub markers: Vec<Marker>,
    /// Edge count derived from element connectivity, reported by the loader.
    pub n_edges: u64,
}

impl MeshShard {
    /// Total points on the shard, ghosts included.
    pub fn n_points(&self) -> u64 {
        self.points.len() as u64
    }

    /// Points with the `owned` flag set (non-ghost).
    pub fn n_points_domain(&self) -> u64 {
        self.points.iter().filter(|p| p.owned).count() as u64
    }

    pub fn n_elems(&self) -> u64 {
        self.elems.len() as u64
    }

    /// Validate shard invariants, returning the first violation.
    ///
    /// Checks that every element references only points present on this shard
    /// and that every transfer send marker is immediately followed by its
    /// receive partner.
    pub fn validate(&self) -> Result<(), HelmError> {
        for (i, elem) in self.elems.iter().enumerate() {
            for &node in &elem.nodes {
                if node >= self.points.len() {
                    return Err(HelmError::NodeOutOfRange {
                        elem: i,
                        node,
                        n_points: self.points.len(),
                    });
                }
            }
        }
        for (i, marker) in self.markers.iter().enumerate() {
            if marker.is_transfer_send() {
                let partner = self.markers.get(i + 1);
                let paired = matches!(
                    partner.map(|m| &m.kind),
                    Some(MarkerKind::Transfer {
                        direction: TransferDirection::Recv,
                        ..
                    })
                );
                if !paired {
                    return Err(HelmError::UnpairedTransferMarker { index: i });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(global: u64, owned: bool) -> GridPoint {
        GridPoint {
            global,
            owned,
            degree: 0,
        }
    }

    #[test]
    fn validate_accepts_well_formed_shard() {
        let shard = MeshShard {
            points: vec![point(1, true), point(2, true), point(3, false)],
            elems: vec![Element {
                nodes: vec![0, 1, 2],
            }],
            markers: vec![
                Marker {
                    tag: "wall".into(),
                    n_elems: 4,
                    kind: MarkerKind::Physical,
                },
                Marker {
                    tag: "send_1".into(),
                    n_elems: 0,
                    kind: MarkerKind::Transfer {
                        peer: 1,
                        direction: TransferDirection::Send,
                        n_vertices: 2,
                    },
                },
                Marker {
                    tag: "recv_1".into(),
                    n_elems: 0,
                    kind: MarkerKind::Transfer {
                        peer: 1,
                        direction: TransferDirection::Recv,
                        n_vertices: 3,
                    },
                },
            ],
            n_edges: 3,
        };
        assert!(shard.validate().is_ok());
        assert_eq!(shard.n_points(), 3);
        assert_eq!(shard.n_points_domain(), 2);
    }

    #[test]
    fn validate_rejects_node_out_of_range() {
        let shard = MeshShard {
            points: vec![point(1, true)],
            elems: vec![Element { nodes: vec![0, 5] }],
            ..Default::default()
        };
        match shard.validate() {
            Err(HelmError::NodeOutOfRange { elem: 0, node: 5, .. }) => {}
            other => panic!("expected NodeOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_unpaired_send_marker() {
        let shard = MeshShard {
            markers: vec![Marker {
                tag: "send_2".into(),
                n_elems: 0,
                kind: MarkerKind::Transfer {
                    peer: 2,
                    direction: TransferDirection::Send,
                    n_vertices: 7,
                },
            }],
            ..Default::default()
        };
        match shard.validate() {
            Err(HelmError::UnpairedTransferMarker { index: 0 }) => {}
            other => panic!("expected UnpairedTransferMarker, got {other:?}"),
        }
    }
}
