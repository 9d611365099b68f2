//! Register field positions and fixed register addresses.
//!
//! This module pins down where the pipeline's inputs live inside the raw
//! register words carried by an [`AddressMap`](crate::fabric::map::AddressMap):
//! 1. **Base/Limit Fields:** Generation-specific positions of the DRAM base
//!    and limit address fields.
//! 2. **Hole Fields:** The legacy-MMIO-hole enable bit and hole-base field.
//! 3. **Hash Gates:** Per-granularity hash enable bits for Gen3 and Gen4+.
//!
//! Field widths and positions changed at Gen4 when the DRAM map registers
//! moved; every extraction here is keyed off the generation.

use crate::common::bits::genmask;
use crate::fabric::config::Generation;

/// Shift applied to base/limit register fields to obtain true addresses:
/// base and limit are recorded at 256 MiB granularity.
pub const DRAM_BASE_LIMIT_LSB: u8 = 28;

/// Register offset of the DRAM hole-base register, read broadcast.
pub const DRAM_HOLE_BASE_REG: u16 = 0x104;

/// Mask of the hole-base field inside the hole-base register (bits 31:24).
pub const DRAM_HOLE_BASE_MASK: u32 = 0xFF00_0000;

/// Legacy-MMIO-hole enable bit (bit 1): in the base register before Gen4, in
/// the control register at Gen4 and later.
const LEGACY_MMIO_HOLE_EN: u32 = 1 << 1;

/// Returns the register function the hole-base register lives under.
#[inline]
pub fn dram_hole_base_func(generation: Generation) -> u8 {
    if generation.is_gen4_or_later() {
        7
    } else {
        0
    }
}

/// Extracts the DRAM base-address field and shifts it to a true address.
///
/// Pre-Gen4 the field occupies bits 31:12 of the base register; at Gen4+ it
/// occupies bits 27:0 of the relocated register.
pub fn base_address(generation: Generation, base: u32) -> u64 {
    let field = if generation.is_gen4_or_later() {
        u64::from(base) & genmask(27, 0)
    } else {
        (u64::from(base) & genmask(31, 12)) >> 12
    };

    field << DRAM_BASE_LIMIT_LSB
}

/// Extracts the DRAM limit-address field and composes the inclusive limit:
/// the field shifted to granularity with the low-order granularity bits set.
pub fn dram_limit(generation: Generation, limit: u32) -> u64 {
    let field = if generation.is_gen4_or_later() {
        u64::from(limit) & genmask(27, 0)
    } else {
        (u64::from(limit) & genmask(31, 12)) >> 12
    };

    (field << DRAM_BASE_LIMIT_LSB) | genmask(DRAM_BASE_LIMIT_LSB - 1, 0)
}

/// Reads the legacy-MMIO-hole enable flag from the generation-correct
/// register word.
pub fn legacy_hole_en(generation: Generation, base: u32, ctl: u32) -> bool {
    let reg = if generation.is_gen4_or_later() {
        ctl
    } else {
        base
    };

    reg & LEGACY_MMIO_HOLE_EN != 0
}

/// Gen3 hash enable gates, read from the control word (bits 20..22).
pub fn gen3_hash_gates(ctl: u32) -> (bool, bool, bool) {
    (
        ctl & (1 << 20) != 0, // 64K
        ctl & (1 << 21) != 0, // 2M
        ctl & (1 << 22) != 0, // 1G
    )
}

/// Gen4/Gen4.5 hash enable gates, read from the control word (bits 8..10 and
/// bit 15 for the 1T granularity).
pub fn gen4_hash_gates(ctl: u32) -> (bool, bool, bool, bool) {
    (
        ctl & (1 << 8) != 0,  // 64K
        ctl & (1 << 9) != 0,  // 2M
        ctl & (1 << 10) != 0, // 1G
        ctl & (1 << 15) != 0, // 1T
    )
}
