//! Gen4.5 1K/2K hash: interleave bits picked by channel count and hash
//! granularity, each dehashed from four gated sources including the 1T tap.
//!
//! The 2K layouts put one select bit at 8 and the rest from bit 12 up; the
//! power-of-two 1K layouts keep two select bits at 8 and 9. Both sides of
//! the round trip must agree on the layout bit for bit.

use proptest::prelude::*;
use rstest::rstest;

use zen_atl::{Generation, InterleaveMode, NormAddr, SysAddr, TranslationError, Translator};

use crate::common::hash;
use crate::common::maps;
use crate::common::mocks::FixedFabric;

#[rstest]
#[case(InterleaveMode::Gen4p5Nps4Hash2Chan2K, 2, &[8])]
#[case(InterleaveMode::Gen4p5Nps2Hash4Chan2K, 4, &[8, 12])]
#[case(InterleaveMode::Gen4p5Nps1Hash8Chan2K, 8, &[8, 12, 13])]
#[case(InterleaveMode::Gen4p5Nps1Hash16Chan2K, 16, &[8, 12, 13, 14])]
#[case(InterleaveMode::Gen4p5Nps4Hash2Chan1K, 2, &[8])]
#[case(InterleaveMode::Gen4p5Nps2Hash4Chan1K, 4, &[8, 9])]
#[case(InterleaveMode::Gen4p5Nps1Hash8Chan1K, 8, &[8, 9, 12])]
#[case(InterleaveMode::Gen4p5Nps1Hash16Chan1K, 16, &[8, 9, 12, 13])]
fn round_trips_the_write_path(
    #[case] mode: InterleaveMode,
    #[case] num_chan: u8,
    #[case] select_bits: &[u8],
) {
    let config = maps::config(Generation::Gen4p5);

    proptest!(|(sys in 0u64..(1 << 44), g64k: bool, g2m: bool, g1g: bool, g1t: bool)| {
        let ctl = maps::gen4_ctl(g64k, g2m, g1g, g1t);
        let fabric = FixedFabric::new(maps::interleaved_map(
            Generation::Gen4p5,
            mode,
            num_chan,
            8,
            ctl,
        ));
        let translator = Translator::new(&config, &fabric);

        let hashed = hash::gen4p5_forward(sys, select_bits, ctl);
        let (norm, select) = hash::normalize(hashed, hash::positions(select_bits));

        prop_assert_eq!(
            translator.translate(0, 0, select as u8, NormAddr::new(norm)),
            Ok(SysAddr::new(sys))
        );
    });
}

#[test]
fn terabyte_gate_folds_the_high_sources() {
    let config = maps::config(Generation::Gen4p5);
    let ctl = maps::gen4_ctl(false, false, false, true);
    let fabric = FixedFabric::new(maps::interleaved_map(
        Generation::Gen4p5,
        InterleaveMode::Gen4p5Nps4Hash2Chan2K,
        2,
        8,
        ctl,
    ));
    let translator = Translator::new(&config, &fabric);

    // Bit 40 is the 1T source for interleave bit 8.
    assert_eq!(
        translator.translate(0, 0, 0, NormAddr::new(1 << 39)),
        Ok(SysAddr::new((1 << 40) | (1 << 8)))
    );
}

#[test]
fn unhashed_geometries_pass_through() {
    let config = maps::config(Generation::Gen4p5);

    // Three-channel Gen4.5 interleaves carry no hashed physical address
    // bits; even with every gate set the select insertion is pure rotation.
    let ctl = maps::gen4_ctl(true, true, true, true);
    let fabric = FixedFabric::new(maps::interleaved_map(
        Generation::Gen4p5,
        InterleaveMode::Gen4p5Nps4Hash3Chan2K,
        3,
        8,
        ctl,
    ));
    let translator = Translator::new(&config, &fabric);

    // Select 2 over two contiguous bits at 8.
    assert_eq!(
        translator.translate(0, 0, 2, NormAddr::new(0x1_0000)),
        Ok(SysAddr::new(0x4_0000 | (2 << 8)))
    );
}

#[test]
fn rejects_unexpected_interleave_bit_position() {
    let config = maps::config(Generation::Gen4p5);
    let fabric = FixedFabric::new(maps::interleaved_map(
        Generation::Gen4p5,
        InterleaveMode::Gen4p5Nps1Hash8Chan2K,
        8,
        9,
        0,
    ));
    let translator = Translator::new(&config, &fabric);

    assert_eq!(
        translator.translate(0, 0, 0, NormAddr::new(0)),
        Err(TranslationError::InterleaveBit { pos: 9 })
    );
}

#[test]
fn rejects_zeroed_interleave_counts() {
    let config = maps::config(Generation::Gen4p5);
    let mut map = maps::interleaved_map(
        Generation::Gen4p5,
        InterleaveMode::Gen4p5Nps1Hash8Chan2K,
        8,
        8,
        0,
    );
    map.num_intlv_chan = 0;
    map.num_intlv_dies = 0;
    map.num_intlv_sockets = 0;
    map.total_intlv_chan = 0;
    map.total_intlv_bits = 0;

    let fabric = FixedFabric::new(map);
    assert_eq!(
        Translator::new(&config, &fabric).translate(0, 0, 0, NormAddr::new(0x1000)),
        Err(TranslationError::Dehash {
            mode: InterleaveMode::Gen4p5Nps1Hash8Chan2K
        })
    );
}

#[test]
fn rejects_excess_socket_count() {
    let config = maps::config(Generation::Gen4p5);
    let mut map = maps::interleaved_map(
        Generation::Gen4p5,
        InterleaveMode::Gen4p5Nps1Hash8Chan2K,
        8,
        8,
        0,
    );
    map.num_intlv_sockets = 4;
    map.total_intlv_chan = 32;
    map.total_intlv_bits = 5;

    let fabric = FixedFabric::new(map);
    assert_eq!(
        Translator::new(&config, &fabric).translate(0, 0, 0, NormAddr::new(0)),
        Err(TranslationError::SocketInterleave { count: 4 })
    );
}
