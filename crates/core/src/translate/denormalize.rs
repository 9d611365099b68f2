//! Pre-interleave address reconstruction.
//!
//! Normalization stripped the channel-select bits out of the address before
//! the memory controller saw it. This stage puts them back: it derives the
//! select value that routed traffic to the reporting channel, computes which
//! address bit positions that value occupies, and inserts it bit by bit. The
//! select bits re-inserted here are the *hashed* values the hardware routed
//! on; the dehash stage restores the true address bits afterwards.
//!
//! For pure-rotation modes the select bits are contiguous at the interleave
//! bit position. The hashed Gen3/Gen4/Gen4.5 power-of-two modes keep only the
//! lowest select bit(s) there and carry the remainder from bit 12 upward, the
//! same split the dehasher's rehash vector describes.

use crate::common::bits::expand_bits;
use crate::common::error::TranslationError;
use crate::fabric::config::FabricConfig;
use crate::fabric::map::{AddressMap, InterleaveMode};
use crate::translate::TranslationContext;

/// Bits needed to cover `count` values, i.e. ceil(log2(count)).
#[inline]
fn bits_for(count: u8) -> u8 {
    if count <= 1 {
        0
    } else {
        (u8::BITS - (count - 1).leading_zeros()) as u8
    }
}

/// Derives the interleave-select value for the reporting channel: channel
/// bits lowest, then die bits, then socket bits, matching the fabric ID
/// layout.
fn channel_select(
    config: &FabricConfig,
    ctx: &TranslationContext,
) -> Result<u16, TranslationError> {
    let phys_chan = config.component_of(ctx.fabric_id) as u8;
    let logical_chan =
        ctx.map
            .logical_channel(phys_chan)
            .ok_or(TranslationError::RemapLookup {
                inst_id: phys_chan,
            })?;

    let chan_bits = bits_for(ctx.map.num_intlv_chan);
    let die_bits = bits_for(ctx.map.num_intlv_dies);

    let die = config.die_of(ctx.fabric_id) % u16::from(ctx.map.num_intlv_dies.max(1));
    let socket = config.socket_of(ctx.fabric_id) % u16::from(ctx.map.num_intlv_sockets.max(1));

    Ok(socket << (chan_bits + die_bits) | die << chan_bits | u16::from(logical_chan))
}

/// Computes the bitmask of address positions the select value occupies.
///
/// Starts with a contiguous run at the interleave bit position and, for the
/// hashed split-position modes, opens a gap so the upper select bits land at
/// bit 12 — mirroring the rehash-vector construction used when dehashing.
pub(crate) fn select_positions(map: &AddressMap) -> u64 {
    use InterleaveMode::*;

    let run = ((1u64 << map.total_intlv_bits) - 1) << map.intlv_bit_pos;

    match map.intlv_mode {
        // One low select bit at the interleave bit, remainder from bit 12.
        Gen3Cod4Hash2Chan | Gen3Cod2Hash4Chan | Gen3Cod1Hash8Chan | Gen4Nps4Hash2Chan
        | Gen4Nps2Hash4Chan | Gen4Nps1Hash8Chan | Gen4p5Nps4Hash2Chan1K
        | Gen4p5Nps4Hash2Chan2K | Gen4p5Nps2Hash4Chan2K | Gen4p5Nps1Hash8Chan2K
        | Gen4p5Nps1Hash16Chan2K => {
            // A start position at or above the split leaves nothing to move;
            // the dehash stage rejects such positions outright.
            let split = map.intlv_bit_pos + 1;
            if split < 12 {
                expand_bits(split, 12 - split, run)
            } else {
                run
            }
        }

        // 1K-granularity modes keep two low select bits before the split.
        Gen4p5Nps2Hash4Chan1K | Gen4p5Nps1Hash8Chan1K | Gen4p5Nps1Hash16Chan1K => {
            expand_bits(10, 2, run)
        }

        _ => run,
    }
}

/// Reconstructs the pre-interleave address in `ctx.ret_addr`.
///
/// With no interleaving in effect the address passes through untouched.
/// Otherwise the select bits are inserted one position at a time, lowest
/// first, so each insertion shifts the still-compact upper bits into place.
pub(crate) fn denormalize(
    config: &FabricConfig,
    ctx: &mut TranslationContext,
) -> Result<(), TranslationError> {
    if ctx.map.total_intlv_bits == 0 {
        return Ok(());
    }

    // An inconsistent interleave geometry means the map contract was not
    // honored upstream; refuse rather than guess.
    if !ctx.map.is_consistent() {
        return Err(TranslationError::Denormalize {
            mode: ctx.map.intlv_mode,
        });
    }

    let select = channel_select(config, ctx)?;

    if u32::from(select) >= 1u32 << ctx.map.total_intlv_bits {
        return Err(TranslationError::Denormalize {
            mode: ctx.map.intlv_mode,
        });
    }

    let mut addr = ctx.ret_addr;
    let mut select = u64::from(select);
    let mut positions = select_positions(&ctx.map);

    while positions != 0 {
        let pos = positions.trailing_zeros() as u8;

        addr = expand_bits(pos, 1, addr);
        addr |= (select & 1) << pos;

        select >>= 1;
        positions &= positions - 1;
    }

    ctx.ret_addr = addr;

    Ok(())
}
