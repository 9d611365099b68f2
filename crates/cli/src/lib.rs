//! Snapshot-backed fabric access for offline translation.
//!
//! The kernel-side consumers of the translation core read live configuration
//! registers. For offline diagnosis this crate replays a *fabric snapshot*
//! instead: a JSON capture of the fabric configuration, the socket/die → node
//! table, per-node address maps, and the register words the pipeline reads.

/// Fabric snapshot model and its collaborator implementation.
pub mod snapshot;

pub use snapshot::{FabricSnapshot, NodeSnapshot, RegisterWord};
