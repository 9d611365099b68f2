//! The address-translation pipeline.
//!
//! This module drives the strict linear pipeline that turns a normalized
//! per-channel address into a system physical address:
//! 1. **Resolution:** Node lookup and address-map fetch via the collaborator.
//! 2. **Denormalization:** Re-insert the channel-select bits.
//! 3. **Base/Hole:** Add the DRAM base and legacy-hole offsets, either before
//!    or after dehashing depending on generation and mode.
//! 4. **Dehashing:** Reverse hashed channel interleaving.
//! 5. **Limit Check:** Validate the result against the map's DRAM limit.
//!
//! Every stage either succeeds and advances or fails the whole call; there is
//! no partial result and no retry.

/// Base/hole adjustment and DRAM limit validation.
pub(crate) mod base_hole;

/// Hash-interleave reversal.
pub(crate) mod dehash;

/// Pre-interleave address reconstruction.
pub(crate) mod denormalize;

use tracing::{debug, warn};

use crate::common::addr::{NormAddr, SysAddr};
use crate::common::error::TranslationError;
use crate::fabric::access::Fabric;
use crate::fabric::config::{FabricConfig, Generation};
use crate::fabric::map::{AddressMap, InterleaveMode};

/// Per-call working state, created at entry and discarded at return.
///
/// `ret_addr` starts as the normalized address and is mutated in place by
/// each stage until it holds the system physical address.
pub(crate) struct TranslationContext {
    /// Working address.
    pub(crate) ret_addr: u64,
    /// Address map governing the reported channel.
    pub(crate) map: AddressMap,
    /// Resolved internal node identifier.
    pub(crate) node_id: u16,
    /// Channel instance, local to the node.
    pub(crate) inst_id: u8,
    /// System-wide channel fabric ID (node bits plus instance bits).
    pub(crate) fabric_id: u16,
}

/// Decides whether the base/hole adjustment runs after dehashing instead of
/// before it.
///
/// Gen3.5, Gen4, and the Gen3 six-channel mode apply interleaving to the
/// post-base address, so the offsets must be re-inserted only once the hash
/// bits have been restored.
pub(crate) fn late_hole_remove(generation: Generation, mode: InterleaveMode) -> bool {
    if generation == Generation::Gen3p5 {
        return true;
    }

    if generation == Generation::Gen4 {
        return true;
    }

    if mode == InterleaveMode::Gen3SixChan {
        return true;
    }

    false
}

/// Translates normalized memory-controller addresses to system physical
/// addresses against one fabric configuration and collaborator.
///
/// Translation is a pure, synchronous computation over caller-owned state;
/// a `Translator` is freely shareable across threads as long as the
/// collaborator is.
pub struct Translator<'a, F: Fabric + ?Sized> {
    config: &'a FabricConfig,
    fabric: &'a F,
}

impl<'a, F: Fabric + ?Sized> Translator<'a, F> {
    /// Creates a translator over a fabric configuration and collaborator.
    pub fn new(config: &'a FabricConfig, fabric: &'a F) -> Self {
        Self { config, fabric }
    }

    /// Returns the fabric configuration this translator runs against.
    pub fn config(&self) -> &FabricConfig {
        self.config
    }

    /// Translates the normalized address reported by a channel instance into
    /// a system physical address.
    ///
    /// # Errors
    ///
    /// Returns a stage-tagged [`TranslationError`] on the first failing
    /// stage; the address is never partially translated.
    pub fn translate(
        &self,
        socket_id: u8,
        die_id: u8,
        channel_instance_id: u8,
        addr: NormAddr,
    ) -> Result<SysAddr, TranslationError> {
        if self.config.generation == Generation::Unknown {
            warn!("translation refused: hardware generation is unknown");
            return Err(TranslationError::UnknownGeneration);
        }

        let node_id = self
            .fabric
            .resolve_node(socket_id, die_id)
            .map_err(|source| {
                warn!(socket_id, die_id, %source, "failed to resolve node");
                TranslationError::NodeResolution {
                    socket_id,
                    die_id,
                    source,
                }
            })?;

        let map = self
            .fabric
            .address_map(node_id, channel_instance_id)
            .map_err(|source| {
                warn!(node_id, channel_instance_id, %source, "failed to fetch address map");
                TranslationError::MapFetch {
                    node_id,
                    inst_id: channel_instance_id,
                    source,
                }
            })?;

        let mut ctx = TranslationContext {
            ret_addr: addr.val(),
            fabric_id: self.config.fabric_id(node_id, channel_instance_id),
            map,
            node_id,
            inst_id: channel_instance_id,
        };

        denormalize::denormalize(self.config, &mut ctx)?;
        debug!(addr = format_args!("{:#x}", ctx.ret_addr), "denormalized");

        let late = late_hole_remove(self.config.generation, ctx.map.intlv_mode);

        if !late {
            base_hole::add_base_and_hole(self.config, self.fabric, &mut ctx)?;
        }

        dehash::dehash(&mut ctx)?;
        debug!(addr = format_args!("{:#x}", ctx.ret_addr), "dehashed");

        if late {
            base_hole::add_base_and_hole(self.config, self.fabric, &mut ctx)?;
        }

        base_hole::check_limit(self.config, &ctx)?;

        Ok(SysAddr::new(ctx.ret_addr))
    }
}
