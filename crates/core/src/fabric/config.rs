//! Hardware generation and fabric configuration.
//!
//! This module models the read-only description of the platform that every
//! translation consults:
//! 1. **Generation:** Closed enumeration of supported data-fabric revisions.
//! 2. **Configuration:** Masks and shifts for decomposing a system-wide
//!    channel fabric ID into its component, die, node, and socket fields.
//!
//! A `FabricConfig` is produced once at startup by a topology-discovery
//! collaborator and injected into the translator by reference; it is never
//! mutated afterwards, so unsynchronized concurrent reads are safe.

use serde::{Deserialize, Serialize};

/// Data-fabric hardware generation.
///
/// Drives every generation-specific branch of the pipeline. [`Generation::Unknown`]
/// makes translation fail fast before any collaborator is invoked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Generation {
    /// Generation could not be determined; translation is refused.
    #[default]
    Unknown,
    /// Second-generation fabric.
    Gen2,
    /// Third-generation fabric.
    Gen3,
    /// Third-generation fabric, revised register layout.
    Gen3p5,
    /// Fourth-generation fabric.
    Gen4,
    /// Fourth-generation fabric with 1K/2K hash granularities.
    Gen4p5,
}

impl Generation {
    /// Returns `true` for Gen4 and later, which moved the base/limit and
    /// control fields to a new register layout.
    #[inline]
    pub fn is_gen4_or_later(self) -> bool {
        self >= Generation::Gen4
    }
}

/// Flags for quirks that cut across the generation split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricFlags {
    /// The platform uses the legacy indirect-access register offsets.
    /// Consumed by register-access collaborators, not by the pipeline.
    pub legacy_register_offsets: bool,
}

/// Process-wide fabric configuration, initialized once at startup.
///
/// The masks operate on the 16-bit system-wide channel fabric ID. The die and
/// socket shifts are pre-adjusted to include the node shift, so all three
/// apply directly to the fabric ID.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Detected hardware generation.
    pub generation: Generation,

    /// Mask selecting the channel-component field of a fabric ID.
    pub component_id_mask: u16,
    /// Mask selecting the die field of a fabric ID.
    pub die_id_mask: u16,
    /// Mask selecting the node field of a fabric ID.
    pub node_id_mask: u16,
    /// Mask selecting the socket field of a fabric ID.
    pub socket_id_mask: u16,

    /// Least-significant bit of the node field within the fabric ID.
    pub node_id_shift: u8,
    /// Least-significant bit of the die field within the fabric ID.
    pub die_id_shift: u8,
    /// Least-significant bit of the socket field within the fabric ID.
    pub socket_id_shift: u8,

    /// Internal nodes per socket; used when decoding error records.
    pub nodes_per_socket: u8,

    /// Cross-generation quirk flags.
    pub flags: FabricFlags,
}

impl FabricConfig {
    /// Composes the system-wide fabric ID for a channel instance on a node.
    #[inline]
    pub fn fabric_id(&self, node_id: u16, inst_id: u8) -> u16 {
        (node_id << self.node_id_shift) & self.node_id_mask | u16::from(inst_id)
    }

    /// Extracts the channel-component field from a fabric ID.
    #[inline]
    pub fn component_of(&self, fabric_id: u16) -> u16 {
        fabric_id & self.component_id_mask
    }

    /// Extracts the die field from a fabric ID.
    #[inline]
    pub fn die_of(&self, fabric_id: u16) -> u16 {
        (fabric_id & self.die_id_mask) >> self.die_id_shift
    }

    /// Extracts the socket field from a fabric ID.
    #[inline]
    pub fn socket_of(&self, fabric_id: u16) -> u16 {
        (fabric_id & self.socket_id_mask) >> self.socket_id_shift
    }
}
