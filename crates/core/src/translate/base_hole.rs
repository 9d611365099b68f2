//! DRAM base and legacy-hole adjustment, plus the final limit check.
//!
//! The denormalized address is still relative to the map's DRAM region. This
//! stage adds the region's base address and, when the legacy MMIO hole below
//! 4 GiB is enabled, skips the address past it. The pipeline invokes it
//! either before or after dehashing, gated by
//! [`late_hole_remove`](crate::translate::late_hole_remove); only one of the
//! two invocations does work for any given translation.

use tracing::warn;

use crate::common::error::TranslationError;
use crate::fabric::access::Fabric;
use crate::fabric::config::FabricConfig;
use crate::fabric::regs;
use crate::translate::TranslationContext;

/// Skips the working address past the legacy MMIO hole when the hole is
/// enabled and the address lies at or above its base.
fn add_legacy_hole<F: Fabric + ?Sized>(
    config: &FabricConfig,
    fabric: &F,
    ctx: &mut TranslationContext,
) -> Result<(), TranslationError> {
    if !regs::legacy_hole_en(config.generation, ctx.map.base, ctx.map.ctl) {
        return Ok(());
    }

    let func = regs::dram_hole_base_func(config.generation);
    let word = fabric
        .read_broadcast(ctx.node_id, func, regs::DRAM_HOLE_BASE_REG)
        .map_err(|source| {
            warn!(node_id = ctx.node_id, %source, "failed to read DRAM hole base");
            TranslationError::BaseAndHole { source }
        })?;

    let hole_base = u64::from(word & regs::DRAM_HOLE_BASE_MASK);

    if ctx.ret_addr >= hole_base {
        ctx.ret_addr = ctx.ret_addr.saturating_add((1u64 << 32) - hole_base);
    }

    Ok(())
}

/// Adds the map's DRAM base address and the legacy-hole offset to the
/// working address.
pub(crate) fn add_base_and_hole<F: Fabric + ?Sized>(
    config: &FabricConfig,
    fabric: &F,
    ctx: &mut TranslationContext,
) -> Result<(), TranslationError> {
    // Saturate rather than wrap: a sum past the top of the address space can
    // only ever be over the DRAM limit, and the limit check reports it.
    ctx.ret_addr = ctx
        .ret_addr
        .saturating_add(regs::base_address(config.generation, ctx.map.base));

    add_legacy_hole(config, fabric, ctx)
}

/// Validates the final address against the map's DRAM limit.
pub(crate) fn check_limit(
    config: &FabricConfig,
    ctx: &TranslationContext,
) -> Result<(), TranslationError> {
    let limit = regs::dram_limit(config.generation, ctx.map.limit);

    if ctx.ret_addr > limit {
        warn!(
            addr = format_args!("{:#x}", ctx.ret_addr),
            limit = format_args!("{:#x}", limit),
            "calculated address is over the DRAM limit"
        );
        return Err(TranslationError::LimitExceeded {
            addr: ctx.ret_addr,
            limit,
        });
    }

    Ok(())
}
