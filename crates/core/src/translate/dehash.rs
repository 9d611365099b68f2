//! Hash-interleave reversal.
//!
//! Hashed interleaving XORs a set of higher-order address bits into each
//! interleave bit at write time to spread hot addresses across channels.
//! Those source bits lie outside the interleave-bit set, so after
//! denormalization they are already in final form; each interleave bit can
//! therefore be recovered by recomputing the hash from the current address
//! and flipping the bit when the recomputed value disagrees with it.
//!
//! Dispatch is by interleave mode, grouped into the five hashed families plus
//! the no-op set (pure rotation modes and modes whose hash was already
//! resolved upstream during channel-instance determination). Every hash term
//! and gate flag is a strict `bool` before combination, so a widened register
//! field can never leak extra bits into the fold.

use tracing::warn;

use crate::common::bits::get_bit;
use crate::common::error::TranslationError;
use crate::fabric::map::InterleaveMode;
use crate::fabric::regs;
use crate::translate::TranslationContext;

/// Recovers one interleave bit: recomputes the hash of `addr` at `intlv_pos`
/// from the gated source taps and flips the bit on disagreement.
fn dehash_bit(addr: u64, intlv_pos: u8, taps: &[(u8, bool)]) -> u64 {
    let intlv_bit = get_bit(intlv_pos, addr);

    let mut hashed_bit = intlv_bit;
    for &(pos, gate) in taps {
        hashed_bit ^= get_bit(pos, addr) & gate;
    }

    if hashed_bit == intlv_bit {
        addr
    } else {
        addr ^ (1u64 << intlv_pos)
    }
}

/// Rejects interleave bit positions outside the generation's allowed set.
fn check_intlv_bit_pos(ctx: &TranslationContext, allowed: &[u8]) -> Result<(), TranslationError> {
    let pos = ctx.map.intlv_bit_pos;
    if !allowed.contains(&pos) {
        warn!(pos, "invalid interleave bit position");
        return Err(TranslationError::InterleaveBit { pos });
    }
    Ok(())
}

/// Rejects die/socket interleave counts above the given bounds.
fn check_intlv_counts(
    ctx: &TranslationContext,
    max_dies: u8,
    max_sockets: u8,
) -> Result<(), TranslationError> {
    if ctx.map.num_intlv_dies > max_dies {
        warn!(count = ctx.map.num_intlv_dies, "invalid die interleave count");
        return Err(TranslationError::DieInterleave {
            count: ctx.map.num_intlv_dies,
        });
    }

    if ctx.map.num_intlv_sockets > max_sockets {
        warn!(
            count = ctx.map.num_intlv_sockets,
            "invalid socket interleave count"
        );
        return Err(TranslationError::SocketInterleave {
            count: ctx.map.num_intlv_sockets,
        });
    }

    Ok(())
}

/// Gen2: a single interleave bit (8 or 9) hashed from fixed, ungated sources.
fn gen2_dehash(ctx: &mut TranslationContext) -> Result<(), TranslationError> {
    check_intlv_bit_pos(ctx, &[8, 9])?;
    check_intlv_counts(ctx, 1, 1)?;

    ctx.ret_addr = dehash_bit(
        ctx.ret_addr,
        ctx.map.intlv_bit_pos,
        &[(12, true), (18, true), (21, true), (30, true)],
    );

    Ok(())
}

/// Gen3 cluster-on-die: one to three interleave bits, each granularity-gated.
fn gen3_dehash(ctx: &mut TranslationContext) -> Result<(), TranslationError> {
    check_intlv_bit_pos(ctx, &[8, 9])?;
    check_intlv_counts(ctx, 1, 1)?;

    let (g64k, g2m, g1g) = regs::gen3_hash_gates(ctx.map.ctl);

    ctx.ret_addr = dehash_bit(
        ctx.ret_addr,
        ctx.map.intlv_bit_pos,
        &[(14, true), (18, g64k), (23, g2m), (32, g1g)],
    );

    // Calculation complete for 2 channels. Continue for 4 and 8 channels.
    if ctx.map.intlv_mode == InterleaveMode::Gen3Cod4Hash2Chan {
        return Ok(());
    }

    ctx.ret_addr = dehash_bit(ctx.ret_addr, 12, &[(16, g64k), (21, g2m), (30, g1g)]);

    // Calculation complete for 4 channels. Continue for 8 channels.
    if ctx.map.intlv_mode == InterleaveMode::Gen3Cod2Hash4Chan {
        return Ok(());
    }

    ctx.ret_addr = dehash_bit(ctx.ret_addr, 13, &[(17, g64k), (22, g2m), (31, g1g)]);

    Ok(())
}

/// Gen3 six-channel: three sequential interleave bits, 2M/1G gates only, with
/// the first bit's extra source offset by the interleave-select width.
fn gen3_6chan_dehash(ctx: &mut TranslationContext) -> Result<(), TranslationError> {
    let intlv_bit_pos = ctx.map.intlv_bit_pos;
    let num_intlv_bits = (u8::BITS - ctx.map.num_intlv_chan.leading_zeros()) as u8;

    let (_, g2m, g1g) = regs::gen3_hash_gates(ctx.map.ctl);

    ctx.ret_addr = dehash_bit(
        ctx.ret_addr,
        intlv_bit_pos,
        &[(intlv_bit_pos + num_intlv_bits, true), (23, g2m), (32, g1g)],
    );

    ctx.ret_addr = dehash_bit(ctx.ret_addr, intlv_bit_pos + 1, &[(21, g2m), (30, g1g)]);

    ctx.ret_addr = dehash_bit(ctx.ret_addr, intlv_bit_pos + 2, &[(22, g2m), (31, g1g)]);

    Ok(())
}

/// Gen4: interleave bit 8 plus up to three more bits keyed off the total
/// interleaved channel count.
fn gen4_dehash(ctx: &mut TranslationContext) -> Result<(), TranslationError> {
    check_intlv_bit_pos(ctx, &[8])?;
    check_intlv_counts(ctx, 1, 2)?;

    let (g64k, g2m, g1g, _) = regs::gen4_hash_gates(ctx.map.ctl);

    // Bit 14 folds into bit 8 only when socket interleaving is off.
    let socket_term = ctx.map.num_intlv_sockets == 1;

    ctx.ret_addr = dehash_bit(
        ctx.ret_addr,
        8,
        &[(16, g64k), (21, g2m), (30, g1g), (14, socket_term)],
    );

    // Hashing is possible with socket interleaving, so key off the total
    // number of channels in the system rather than the map's mode.
    //
    // Calculation complete for 2 channels. Continue for 4, 8, and 16.
    if ctx.map.total_intlv_chan <= 2 {
        return Ok(());
    }

    ctx.ret_addr = dehash_bit(ctx.ret_addr, 12, &[(17, g64k), (22, g2m), (31, g1g)]);

    if ctx.map.total_intlv_chan <= 4 {
        return Ok(());
    }

    ctx.ret_addr = dehash_bit(ctx.ret_addr, 13, &[(18, g64k), (23, g2m), (32, g1g)]);

    if ctx.map.total_intlv_chan <= 8 {
        return Ok(());
    }

    ctx.ret_addr = dehash_bit(ctx.ret_addr, 14, &[(19, g64k), (24, g2m), (33, g1g)]);

    Ok(())
}

/// Interleave bits and their gated source taps for Gen4.5 (64K/2M/1G/1T).
const GEN4P5_TAPS: [(u8, [u8; 4]); 5] = [
    (8, [16, 21, 30, 40]),
    (9, [17, 22, 31, 41]),
    (12, [18, 23, 32, 42]),
    (13, [19, 24, 33, 43]),
    (14, [20, 25, 34, 44]),
];

/// Gen4.5: builds a rehash vector naming exactly which of bits 8, 9, 12, 13,
/// 14 participate, then dehashes each from four gated sources.
fn gen4p5_dehash(ctx: &mut TranslationContext) -> Result<(), TranslationError> {
    use InterleaveMode::{
        Gen4p5Nps1Hash16Chan1K, Gen4p5Nps1Hash8Chan1K, Gen4p5Nps2Hash4Chan1K,
    };

    check_intlv_bit_pos(ctx, &[8])?;
    check_intlv_counts(ctx, 1, 2)?;

    // A hashed map must interleave at least one channel; a zero count is a
    // corrupt map, not a no-op.
    if ctx.map.total_intlv_chan == 0 {
        warn!(mode = ?ctx.map.intlv_mode, "hashed map carries a zero channel count");
        return Err(TranslationError::Dehash {
            mode: ctx.map.intlv_mode,
        });
    }

    let (g64k, g2m, g1g, g1t) = regs::gen4_hash_gates(ctx.map.ctl);

    // Start with a contiguous channel-count mask at bit 8, then open a gap to
    // skip the positions that do not participate: two bits at 10 for the
    // 1K-granularity power-of-two modes, three bits at 9 for all others.
    let mut rehash_vector = u64::from(ctx.map.total_intlv_chan) - 1;
    rehash_vector <<= 8;

    rehash_vector = match ctx.map.intlv_mode {
        Gen4p5Nps2Hash4Chan1K | Gen4p5Nps1Hash8Chan1K | Gen4p5Nps1Hash16Chan1K => {
            crate::common::bits::expand_bits(10, 2, rehash_vector)
        }
        _ => crate::common::bits::expand_bits(9, 3, rehash_vector),
    };

    for (pos, [s64k, s2m, s1g, s1t]) in GEN4P5_TAPS {
        if rehash_vector & (1u64 << pos) != 0 {
            ctx.ret_addr = dehash_bit(
                ctx.ret_addr,
                pos,
                &[(s64k, g64k), (s2m, g2m), (s1g, g1g), (s1t, g1t)],
            );
        }
    }

    Ok(())
}

/// Reverses hashed channel interleaving on the working address.
///
/// Pure-rotation modes and modes whose hash bits were already resolved during
/// channel-instance determination pass through unchanged.
pub(crate) fn dehash(ctx: &mut TranslationContext) -> Result<(), TranslationError> {
    use InterleaveMode::*;

    match ctx.map.intlv_mode {
        // No hashing applied.
        None
        | NoHash2Chan
        | NoHash4Chan
        | NoHash8Chan
        | NoHash16Chan
        | NoHash32Chan
        // Hash bits handled earlier during channel-instance determination.
        | Gen4Nps4Hash3Chan
        | Gen4Nps2Hash5Chan
        | Gen4Nps2Hash6Chan
        | Gen4Nps1Hash10Chan
        | Gen4Nps1Hash12Chan
        | Gen4p5Nps2Hash6Chan1K
        | Gen4p5Nps2Hash6Chan2K
        | Gen4p5Nps1Hash10Chan1K
        | Gen4p5Nps1Hash10Chan2K
        | Gen4p5Nps1Hash12Chan1K
        | Gen4p5Nps1Hash12Chan2K
        | Gen4p5Nps0Hash24Chan1K
        | Gen4p5Nps0Hash24Chan2K
        // No hashed physical address bits in these geometries.
        | Gen4p5Nps4Hash3Chan1K
        | Gen4p5Nps4Hash3Chan2K
        | Gen4p5Nps2Hash5Chan1K
        | Gen4p5Nps2Hash5Chan2K => Ok(()),

        Gen2Hash2Chan => gen2_dehash(ctx),

        Gen3Cod4Hash2Chan | Gen3Cod2Hash4Chan | Gen3Cod1Hash8Chan => gen3_dehash(ctx),

        Gen3SixChan => gen3_6chan_dehash(ctx),

        Gen4Nps4Hash2Chan | Gen4Nps2Hash4Chan | Gen4Nps1Hash8Chan => gen4_dehash(ctx),

        Gen4p5Nps4Hash2Chan1K
        | Gen4p5Nps4Hash2Chan2K
        | Gen4p5Nps2Hash4Chan1K
        | Gen4p5Nps2Hash4Chan2K
        | Gen4p5Nps1Hash8Chan1K
        | Gen4p5Nps1Hash8Chan2K
        | Gen4p5Nps1Hash16Chan1K
        | Gen4p5Nps1Hash16Chan2K => gen4p5_dehash(ctx),
    }
}
