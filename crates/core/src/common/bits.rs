//! Bit-manipulation primitives.
//!
//! The interleave logic needs to describe *which* address bits participate in
//! a hash of variable width, and to open or close gaps of channel-select bits
//! inside a 64-bit address. This module provides the three primitives that
//! arithmetic is built from:
//! 1. **Extraction:** [`get_bit`] reads a single bit as a `bool`.
//! 2. **Expansion:** [`expand_bits`] opens a zero-filled gap.
//! 3. **Removal:** [`remove_bits`] deletes an inclusive bit range.

use tracing::warn;

/// Returns a mask with bits `[lo, hi]` (inclusive) set.
///
/// Both indices must be below 64 and `lo <= hi`; callers in this crate only
/// use constant, in-range arguments.
#[inline]
pub(crate) const fn genmask(hi: u8, lo: u8) -> u64 {
    (u64::MAX >> (63 - hi)) & !((1u64 << lo) - 1)
}

/// Extracts bit `bit_num` of `data` as a boolean.
///
/// Used wherever a hash term must be strictly 0/1 before it is combined with
/// an enable flag; combining wider field extractions directly would silently
/// break if a register field ever grew.
#[inline]
pub fn get_bit(bit_num: u8, data: u64) -> bool {
    (data >> bit_num) & 1 != 0
}

/// Opens a zero-filled gap of `num_bits` bits in `data` starting at `bit_num`.
///
/// Bits at or above `bit_num` shift up by `num_bits`; bits below stay put.
/// A `num_bits` of zero returns `data` unchanged, so callers do not need to
/// special-case unit interleave counts. A `bit_num` of zero is a plain shift.
///
/// ```
/// use zen_atl::common::bits::expand_bits;
///
/// // data = 11111111'b, gap of 2 at bit 3 -> 1111100111'b
/// assert_eq!(expand_bits(3, 2, 0xFF), 0x3E7);
/// ```
pub fn expand_bits(bit_num: u8, num_bits: u8, data: u64) -> u64 {
    if num_bits == 0 {
        return data;
    }

    if bit_num == 0 {
        return data << num_bits;
    }

    let low = data & genmask(bit_num - 1, 0);
    let high = (data & genmask(63, bit_num)) << num_bits;

    low | high
}

/// Deletes bits `[low_bit, high_bit]` (inclusive) from `data`, closing the gap
/// by shifting higher bits down.
///
/// An inverted or out-of-range pair indicates a caller bug in interleave-width
/// bookkeeping; the result is 0 and a warning is logged rather than panicking
/// in an error-reporting path.
///
/// ```
/// use zen_atl::common::bits::remove_bits;
///
/// // data = XXXYYZZZ'b, remove [3, 4] -> XXXZZZ'b
/// assert_eq!(remove_bits(3, 4, 0b1011_0101), 0b10_1101);
/// ```
pub fn remove_bits(low_bit: u8, high_bit: u8, data: u64) -> u64 {
    if high_bit >= 64 || low_bit >= 64 || low_bit > high_bit {
        warn!(low_bit, high_bit, "invalid bit range");
        return 0;
    }

    if low_bit == 0 {
        // Removing [0, 63] removes every bit.
        if high_bit == 63 {
            return 0;
        }
        return data >> (high_bit + 1);
    }

    let low = data & genmask(low_bit - 1, 0);
    let high = if high_bit == 63 {
        0
    } else {
        (data & genmask(63, high_bit + 1)) >> (high_bit - low_bit + 1)
    };

    low | high
}
