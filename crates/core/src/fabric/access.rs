//! External collaborator trait for topology and register access.
//!
//! The pipeline itself is pure bit algebra; everything that touches hardware
//! state goes through [`Fabric`]:
//! 1. **Resolution:** Socket/die to node lookup and address-map fetch.
//! 2. **Register Reads:** Instance-scoped and broadcast reads of fabric
//!    configuration registers.
//!
//! All methods are synchronous and fallible; a single failed read aborts the
//! surrounding translation. The core performs no caching, no retries, and no
//! locking of its own — callers that need serialized register access must
//! provide it in their implementation.

use crate::common::error::AccessError;
use crate::fabric::map::AddressMap;

/// Access to the platform's fabric topology and configuration registers.
///
/// Implemented by the platform glue (or by a captured snapshot for offline
/// diagnosis) and borrowed by the
/// [`Translator`](crate::translate::Translator).
pub trait Fabric {
    /// Resolves the internal node identifier for a socket/die pair.
    fn resolve_node(&self, socket_id: u8, die_id: u8) -> Result<u16, AccessError>;

    /// Fetches the DRAM address map governing a channel instance on a node.
    fn address_map(&self, node_id: u16, inst_id: u8) -> Result<AddressMap, AccessError>;

    /// Reads a fabric configuration register scoped to one instance.
    fn read_instance(
        &self,
        node_id: u16,
        func: u8,
        reg: u16,
        inst_id: u8,
    ) -> Result<u32, AccessError>;

    /// Reads a fabric configuration register broadcast across a node.
    fn read_broadcast(&self, node_id: u16, func: u8, reg: u16) -> Result<u32, AccessError>;
}
