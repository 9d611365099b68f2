//! Gen3 cluster-on-die: one to three interleave bits, each gate-controlled.
//!
//! The channel-select layout is split: the low select bit sits at the
//! interleave bit position and the remainder occupy bits 12 and 13. The
//! round trips below would fail if either side of the pipeline disagreed on
//! that layout.

use proptest::prelude::*;
use rstest::rstest;

use zen_atl::{
    AddressMap, Generation, InterleaveMode, NormAddr, SysAddr, TranslationError, Translator,
};

use crate::common::hash;
use crate::common::maps;
use crate::common::mocks::FixedFabric;

fn map(mode: InterleaveMode, num_chan: u8, pos: u8, ctl: u32) -> AddressMap {
    maps::interleaved_map(Generation::Gen3, mode, num_chan, pos, ctl)
}

fn select_bits(num_chan: u8, pos: u8) -> Vec<u8> {
    match num_chan {
        2 => vec![pos],
        4 => vec![pos, 12],
        _ => vec![pos, 12, 13],
    }
}

#[rstest]
#[case(InterleaveMode::Gen3Cod4Hash2Chan, 2)]
#[case(InterleaveMode::Gen3Cod2Hash4Chan, 4)]
#[case(InterleaveMode::Gen3Cod1Hash8Chan, 8)]
fn round_trips_the_write_path(#[case] mode: InterleaveMode, #[case] num_chan: u8) {
    let config = maps::config(Generation::Gen3);

    proptest!(|(
        sys in 0u64..(1 << 44),
        g64k: bool,
        g2m: bool,
        g1g: bool,
        pos in 8u8..=9,
    )| {
        let ctl = maps::gen3_ctl(g64k, g2m, g1g);
        let fabric = FixedFabric::new(map(mode, num_chan, pos, ctl));
        let translator = Translator::new(&config, &fabric);

        let hashed = hash::gen3_forward(sys, pos, num_chan, ctl);
        let (norm, select) = hash::normalize(hashed, hash::positions(&select_bits(num_chan, pos)));

        prop_assert_eq!(
            translator.translate(0, 0, select as u8, NormAddr::new(norm)),
            Ok(SysAddr::new(sys))
        );
    });
}

#[test]
fn disabled_gates_mask_their_sources() {
    let config = maps::config(Generation::Gen3);

    // All gates off: only the fixed bit-14 source participates.
    let fabric = FixedFabric::new(map(InterleaveMode::Gen3Cod4Hash2Chan, 2, 8, 0));
    let translator = Translator::new(&config, &fabric);

    // Bit 18 is the 64K source; with its gate off it must not flip bit 8.
    assert_eq!(
        translator.translate(0, 0, 0, NormAddr::new(1 << 17)),
        Ok(SysAddr::new(1 << 18))
    );

    // Bit 14 always participates.
    assert_eq!(
        translator.translate(0, 0, 0, NormAddr::new(1 << 13)),
        Ok(SysAddr::new((1 << 14) | (1 << 8)))
    );
}

#[test]
fn rejects_unexpected_interleave_bit_position() {
    let config = maps::config(Generation::Gen3);
    let fabric = FixedFabric::new(map(InterleaveMode::Gen3Cod1Hash8Chan, 8, 12, 0));
    let translator = Translator::new(&config, &fabric);

    assert_eq!(
        translator.translate(0, 0, 0, NormAddr::new(0)),
        Err(TranslationError::InterleaveBit { pos: 12 })
    );
}

#[test]
fn rejects_die_interleaving() {
    let config = maps::config(Generation::Gen3);
    let mut die_map = map(InterleaveMode::Gen3Cod4Hash2Chan, 2, 8, 0);
    die_map.num_intlv_dies = 2;
    die_map.total_intlv_chan = 4;
    die_map.total_intlv_bits = 2;

    let fabric = FixedFabric::new(die_map);
    assert_eq!(
        Translator::new(&config, &fabric).translate(0, 0, 0, NormAddr::new(0)),
        Err(TranslationError::DieInterleave { count: 2 })
    );
}
