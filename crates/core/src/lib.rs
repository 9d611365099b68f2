//! Normalized-to-system DRAM address translation for Zen data-fabric platforms.
//!
//! When a memory controller reports an error it names the failing location by a
//! per-channel *normalized* address. Diagnostic software needs the *system
//! physical* address instead. This crate implements the translation between the
//! two:
//! 1. **Resolution:** Map a (socket, die, channel instance) report to its fabric
//!    node and fetch that node's DRAM address map.
//! 2. **Denormalization:** Re-insert the channel-select bits the controller
//!    stripped, reconstructing the pre-interleave address.
//! 3. **Dehashing:** Reverse the XOR-folded (hashed) channel interleaving used
//!    by each hardware generation.
//! 4. **Adjustment:** Add the DRAM base address and the legacy MMIO hole offset
//!    in the generation-correct order, then validate against the DRAM limit.
//!
//! Topology discovery and register access are external collaborators reached
//! through the [`Fabric`] trait; the translation itself is pure, synchronous
//! bit algebra over a read-only [`FabricConfig`].

/// Common types: address newtypes, bit primitives, error definitions.
pub mod common;
/// Fabric model: hardware generation, configuration, address maps, register
/// fields, and the external collaborator trait.
pub mod fabric;
/// Memory-controller error-record decoding.
pub mod report;
/// The translation pipeline: denormalize, dehash, base/hole, limit check.
pub mod translate;

pub use crate::common::addr::{NormAddr, SysAddr};
pub use crate::common::error::{AccessError, TranslationError};
pub use crate::fabric::access::Fabric;
pub use crate::fabric::config::{FabricConfig, Generation};
pub use crate::fabric::map::{AddressMap, InterleaveMode};
pub use crate::report::ErrorRecord;
pub use crate::translate::Translator;
