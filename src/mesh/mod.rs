//! Distributed mesh shard data model and header scanning.

pub mod header;
pub mod shard;

pub use header::{DatabaseMeta, HeaderScanner, MeshHeader, StructuredMeta};
pub use shard::{Element, GridPoint, Marker, MarkerKind, MeshShard, TransferDirection};
