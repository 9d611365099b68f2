//! Channel-select derivation and re-insertion, exercised through the public
//! pipeline with pure-rotation maps so no hashing obscures the insertion.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use zen_atl::common::bits::expand_bits;
use zen_atl::{Generation, InterleaveMode, NormAddr, SysAddr, TranslationError, Translator};

use crate::common::maps;
use crate::common::mocks::FixedFabric;

#[test]
fn no_interleave_passes_address_through() {
    let config = maps::config(Generation::Gen3);
    let fabric = FixedFabric::new(maps::flat_map(Generation::Gen3));
    let translator = Translator::new(&config, &fabric);

    assert_eq!(
        translator.translate(0, 0, 0, NormAddr::new(0x1234_5678)),
        Ok(SysAddr::new(0x1234_5678))
    );
}

#[test]
fn rotation_inserts_contiguous_select() {
    let config = maps::config(Generation::Gen3);
    let map = maps::interleaved_map(Generation::Gen3, InterleaveMode::NoHash8Chan, 8, 8, 0);
    let fabric = FixedFabric::new(map);
    let translator = Translator::new(&config, &fabric);

    let norm = 0x0003_4500;
    for chan in 0..8u8 {
        let expected = expand_bits(8, 3, norm) | u64::from(chan) << 8;
        assert_eq!(
            translator.translate(0, 0, chan, NormAddr::new(norm)),
            Ok(SysAddr::new(expected))
        );
    }
}

#[test]
fn remap_table_translates_physical_to_logical() {
    let config = maps::config(Generation::Gen3);
    let mut map = maps::interleaved_map(Generation::Gen3, InterleaveMode::NoHash4Chan, 4, 8, 0);
    map.remap[..4].copy_from_slice(&[3, 2, 1, 0]);

    let fabric = FixedFabric::new(map);
    let translator = Translator::new(&config, &fabric);

    // Physical instance 2 sits in remap slot 1, so its select value is 1.
    assert_eq!(
        translator.translate(0, 0, 2, NormAddr::new(0)),
        Ok(SysAddr::new(1 << 8))
    );
}

#[test]
fn unmapped_instance_is_rejected() {
    let config = maps::config(Generation::Gen3);
    let map = maps::interleaved_map(Generation::Gen3, InterleaveMode::NoHash4Chan, 4, 8, 0);
    let fabric = FixedFabric::new(map);
    let translator = Translator::new(&config, &fabric);

    assert_eq!(
        translator.translate(0, 0, 9, NormAddr::new(0)),
        Err(TranslationError::RemapLookup { inst_id: 9 })
    );
}

#[test]
fn inconsistent_geometry_is_rejected() {
    let config = maps::config(Generation::Gen3);
    let mut map = maps::interleaved_map(Generation::Gen3, InterleaveMode::NoHash8Chan, 8, 8, 0);
    map.num_intlv_chan = 4;

    let fabric = FixedFabric::new(map);
    let translator = Translator::new(&config, &fabric);

    assert_eq!(
        translator.translate(0, 0, 0, NormAddr::new(0)),
        Err(TranslationError::Denormalize {
            mode: InterleaveMode::NoHash8Chan
        })
    );
}

proptest! {
    /// Rotation denormalization is exactly gap expansion plus select
    /// insertion, for every channel and either interleave start bit.
    #[test]
    fn rotation_matches_expansion(
        norm in 0u64..(1 << 40),
        chan in 0u8..16,
        pos in 8u8..=9,
    ) {
        let config = maps::config(Generation::Gen3);
        let map = maps::interleaved_map(
            Generation::Gen3,
            InterleaveMode::NoHash16Chan,
            16,
            pos,
            0,
        );
        let fabric = FixedFabric::new(map);
        let translator = Translator::new(&config, &fabric);

        let expected = expand_bits(pos, 4, norm) | u64::from(chan) << pos;
        prop_assert_eq!(
            translator.translate(0, 0, chan, NormAddr::new(norm)),
            Ok(SysAddr::new(expected))
        );
    }
}
