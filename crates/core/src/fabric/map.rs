//! Interleave modes and DRAM address maps.
//!
//! This module models the per-channel interleave description the pipeline
//! consumes:
//! 1. **Interleave Modes:** The closed set of named hardware interleave
//!    schemes, grouped into five families (no-hash rotation, Gen2 hash, Gen3
//!    cluster-on-die hash, Gen3 six-channel, Gen4 hash, Gen4.5 1K/2K hash).
//! 2. **Address Maps:** One per (node, channel instance), carrying the raw
//!    register words, remap table, and interleave geometry.

use serde::{Deserialize, Serialize};

/// Maximum number of channels within a single data fabric, and therefore the
/// size of a map's logical-to-physical remap table.
pub const MAX_CHANNELS: usize = 32;

/// A named hardware interleave scheme.
///
/// Variants encode the channel count, whether hashing is applied, and (for
/// Gen4/Gen4.5) the nodes-per-socket partition and hash granularity. The
/// discriminants are the raw hardware encodings; Gen4.5 modes are the raw
/// channel-count encoding plus `0x20`, and special cases sit above `0x20`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum InterleaveMode {
    /// No interleaving; a single channel covers the map.
    None = 0x00,
    /// Bit-rotation over 2 channels.
    NoHash2Chan = 0x01,
    /// Bit-rotation over 4 channels.
    NoHash4Chan = 0x03,
    /// Bit-rotation over 8 channels.
    NoHash8Chan = 0x05,
    /// Gen3 non-power-of-two interleave over 6 channels.
    Gen3SixChan = 0x06,
    /// Bit-rotation over 16 channels.
    NoHash16Chan = 0x07,
    /// Bit-rotation over 32 channels.
    NoHash32Chan = 0x08,
    /// Gen3 cluster-on-die hash, 4 clusters of 2 channels.
    Gen3Cod4Hash2Chan = 0x0C,
    /// Gen3 cluster-on-die hash, 2 clusters of 4 channels.
    Gen3Cod2Hash4Chan = 0x0D,
    /// Gen3 cluster-on-die hash, 1 cluster of 8 channels.
    Gen3Cod1Hash8Chan = 0x0E,
    /// Gen4 hash, NPS4 partition, 2 channels.
    Gen4Nps4Hash2Chan = 0x10,
    /// Gen4 hash, NPS2 partition, 4 channels.
    Gen4Nps2Hash4Chan = 0x11,
    /// Gen4 hash, NPS1 partition, 8 channels.
    Gen4Nps1Hash8Chan = 0x12,
    /// Gen4 hash, NPS4 partition, 3 channels.
    Gen4Nps4Hash3Chan = 0x13,
    /// Gen4 hash, NPS2 partition, 6 channels.
    Gen4Nps2Hash6Chan = 0x14,
    /// Gen4 hash, NPS1 partition, 12 channels.
    Gen4Nps1Hash12Chan = 0x15,
    /// Gen4 hash, NPS2 partition, 5 channels.
    Gen4Nps2Hash5Chan = 0x16,
    /// Gen4 hash, NPS1 partition, 10 channels.
    Gen4Nps1Hash10Chan = 0x17,
    /// Gen2 hash over 2 channels.
    Gen2Hash2Chan = 0x21,
    /// Gen4.5 1K hash, NPS1, 16 channels.
    Gen4p5Nps1Hash16Chan1K = 0x2C,
    /// Gen4.5 1K hash, NPS0, 24 channels.
    Gen4p5Nps0Hash24Chan1K = 0x2E,
    /// Gen4.5 1K hash, NPS4, 2 channels.
    Gen4p5Nps4Hash2Chan1K = 0x30,
    /// Gen4.5 1K hash, NPS2, 4 channels.
    Gen4p5Nps2Hash4Chan1K = 0x31,
    /// Gen4.5 1K hash, NPS1, 8 channels.
    Gen4p5Nps1Hash8Chan1K = 0x32,
    /// Gen4.5 1K hash, NPS4, 3 channels.
    Gen4p5Nps4Hash3Chan1K = 0x33,
    /// Gen4.5 1K hash, NPS2, 6 channels.
    Gen4p5Nps2Hash6Chan1K = 0x34,
    /// Gen4.5 1K hash, NPS1, 12 channels.
    Gen4p5Nps1Hash12Chan1K = 0x35,
    /// Gen4.5 1K hash, NPS2, 5 channels.
    Gen4p5Nps2Hash5Chan1K = 0x36,
    /// Gen4.5 1K hash, NPS1, 10 channels.
    Gen4p5Nps1Hash10Chan1K = 0x37,
    /// Gen4.5 2K hash, NPS4, 2 channels.
    Gen4p5Nps4Hash2Chan2K = 0x40,
    /// Gen4.5 2K hash, NPS2, 4 channels.
    Gen4p5Nps2Hash4Chan2K = 0x41,
    /// Gen4.5 2K hash, NPS1, 8 channels.
    Gen4p5Nps1Hash8Chan2K = 0x42,
    /// Gen4.5 2K hash, NPS1, 16 channels.
    Gen4p5Nps1Hash16Chan2K = 0x43,
    /// Gen4.5 2K hash, NPS4, 3 channels.
    Gen4p5Nps4Hash3Chan2K = 0x44,
    /// Gen4.5 2K hash, NPS2, 6 channels.
    Gen4p5Nps2Hash6Chan2K = 0x45,
    /// Gen4.5 2K hash, NPS1, 12 channels.
    Gen4p5Nps1Hash12Chan2K = 0x46,
    /// Gen4.5 2K hash, NPS0, 24 channels.
    Gen4p5Nps0Hash24Chan2K = 0x47,
    /// Gen4.5 2K hash, NPS2, 5 channels.
    Gen4p5Nps2Hash5Chan2K = 0x48,
    /// Gen4.5 2K hash, NPS1, 10 channels.
    Gen4p5Nps1Hash10Chan2K = 0x49,
}

impl InterleaveMode {
    /// Decodes a raw hardware interleave encoding, if recognized.
    pub fn from_raw(raw: u8) -> Option<Self> {
        use InterleaveMode::*;

        Some(match raw {
            0x00 => None,
            0x01 => NoHash2Chan,
            0x03 => NoHash4Chan,
            0x05 => NoHash8Chan,
            0x06 => Gen3SixChan,
            0x07 => NoHash16Chan,
            0x08 => NoHash32Chan,
            0x0C => Gen3Cod4Hash2Chan,
            0x0D => Gen3Cod2Hash4Chan,
            0x0E => Gen3Cod1Hash8Chan,
            0x10 => Gen4Nps4Hash2Chan,
            0x11 => Gen4Nps2Hash4Chan,
            0x12 => Gen4Nps1Hash8Chan,
            0x13 => Gen4Nps4Hash3Chan,
            0x14 => Gen4Nps2Hash6Chan,
            0x15 => Gen4Nps1Hash12Chan,
            0x16 => Gen4Nps2Hash5Chan,
            0x17 => Gen4Nps1Hash10Chan,
            0x21 => Gen2Hash2Chan,
            0x2C => Gen4p5Nps1Hash16Chan1K,
            0x2E => Gen4p5Nps0Hash24Chan1K,
            0x30 => Gen4p5Nps4Hash2Chan1K,
            0x31 => Gen4p5Nps2Hash4Chan1K,
            0x32 => Gen4p5Nps1Hash8Chan1K,
            0x33 => Gen4p5Nps4Hash3Chan1K,
            0x34 => Gen4p5Nps2Hash6Chan1K,
            0x35 => Gen4p5Nps1Hash12Chan1K,
            0x36 => Gen4p5Nps2Hash5Chan1K,
            0x37 => Gen4p5Nps1Hash10Chan1K,
            0x40 => Gen4p5Nps4Hash2Chan2K,
            0x41 => Gen4p5Nps2Hash4Chan2K,
            0x42 => Gen4p5Nps1Hash8Chan2K,
            0x43 => Gen4p5Nps1Hash16Chan2K,
            0x44 => Gen4p5Nps4Hash3Chan2K,
            0x45 => Gen4p5Nps2Hash6Chan2K,
            0x46 => Gen4p5Nps1Hash12Chan2K,
            0x47 => Gen4p5Nps0Hash24Chan2K,
            0x48 => Gen4p5Nps2Hash5Chan2K,
            0x49 => Gen4p5Nps1Hash10Chan2K,
            _ => return Option::None,
        })
    }

    /// Returns the raw hardware encoding of this mode.
    #[inline]
    pub fn raw(self) -> u8 {
        self as u8
    }
}

/// A DRAM address map: the interleave description for one (node, channel
/// instance) pair, fetched fresh for each translation.
///
/// Invariant: `total_intlv_chan` equals `num_intlv_chan * num_intlv_dies *
/// num_intlv_sockets`; [`AddressMap::is_consistent`] checks it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMap {
    /// Interleave mode this map operates in.
    pub intlv_mode: InterleaveMode,

    /// Raw DRAM base-address register word.
    pub base: u32,
    /// Raw DRAM limit-address register word.
    pub limit: u32,
    /// Raw DRAM control register word (hash gates, hole enable at Gen4+).
    pub ctl: u32,
    /// Raw interleave register word.
    pub intlv: u32,

    /// Logical-to-physical channel remap table: indexed by logical channel
    /// instance, yielding the physical channel instance.
    pub remap: [u8; MAX_CHANNELS],

    /// Number of bits covering address map 0 when interleaving is
    /// non-power-of-two. Used only by the six-channel mode.
    pub first_map_bits: u8,

    /// Position of the lowest address bit participating in interleaving.
    pub intlv_bit_pos: u8,
    /// Number of channels interleaved in this map.
    pub num_intlv_chan: u8,
    /// Number of dies interleaved in this map.
    pub num_intlv_dies: u8,
    /// Number of sockets interleaved in this map.
    pub num_intlv_sockets: u8,
    /// Total interleaved channels across channel, die, and socket interleave.
    pub total_intlv_chan: u8,
    /// Bits needed to represent `total_intlv_chan` channel selects.
    pub total_intlv_bits: u8,
}

impl Default for AddressMap {
    fn default() -> Self {
        let mut remap = [0u8; MAX_CHANNELS];
        for (logical, phys) in remap.iter_mut().enumerate() {
            *phys = logical as u8;
        }

        Self {
            intlv_mode: InterleaveMode::None,
            base: 0,
            limit: 0,
            ctl: 0,
            intlv: 0,
            remap,
            first_map_bits: 0,
            intlv_bit_pos: 8,
            num_intlv_chan: 1,
            num_intlv_dies: 1,
            num_intlv_sockets: 1,
            total_intlv_chan: 1,
            total_intlv_bits: 0,
        }
    }
}

impl AddressMap {
    /// Returns `true` when the interleave counts satisfy the map invariant.
    pub fn is_consistent(&self) -> bool {
        u32::from(self.num_intlv_chan)
            * u32::from(self.num_intlv_dies)
            * u32::from(self.num_intlv_sockets)
            == u32::from(self.total_intlv_chan)
    }

    /// Finds the logical channel instance whose remap slot holds the given
    /// physical channel instance.
    pub fn logical_channel(&self, phys_inst_id: u8) -> Option<u8> {
        self.remap[..usize::from(self.total_intlv_chan).min(MAX_CHANNELS)]
            .iter()
            .position(|&phys| phys == phys_inst_id)
            .map(|logical| logical as u8)
    }
}
