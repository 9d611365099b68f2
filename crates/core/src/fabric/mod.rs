//! Data-fabric model.
//!
//! This module describes the hardware the translation runs against:
//! 1. **Configuration:** The detected generation and the ID-field layout of
//!    the system-wide channel fabric identifier.
//! 2. **Address Maps:** Per-channel interleave mode, raw register words, and
//!    the logical-to-physical channel remap table.
//! 3. **Register Fields:** Generation-specific field positions inside the raw
//!    base/limit/control register words.
//! 4. **Access:** The external collaborator trait for node resolution, map
//!    fetch, and indirect register reads.

/// External collaborator trait for topology and register access.
pub mod access;

/// Hardware generation and process-wide fabric configuration.
pub mod config;

/// Interleave modes and per-channel DRAM address maps.
pub mod map;

/// Register field positions and fixed register addresses.
pub mod regs;

pub use access::Fabric;
pub use config::{FabricConfig, FabricFlags, Generation};
pub use map::{AddressMap, InterleaveMode, MAX_CHANNELS};
