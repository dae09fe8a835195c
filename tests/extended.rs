#![cfg(feature = "alloc")]

use pcg_engines::{
    DefaultMultiplier, Engine, Error, Extended, NoStream, OneSeq, SeedSource, SpecificSeq,
    TableSource, XshRr, XshRs, XslRr,
};
use rand_core::SeedableRng;

type OneseqXshRr6432 = Engine<u64, u32, OneSeq, DefaultMultiplier, XshRr, true>;
type SetseqXshRr6432 = Engine<u64, u32, SpecificSeq<u64>, DefaultMultiplier, XshRr, true>;
type OneseqXshRr168 = Engine<u16, u8, OneSeq, DefaultMultiplier, XshRr, true>;
type McgXshRs6432 = Engine<u64, u32, NoStream, DefaultMultiplier, XshRs, true>;
type McgXshRr168 = Engine<u16, u8, NoStream, DefaultMultiplier, XshRr, true>;
type SetseqXslRr12864 = Engine<u128, u64, SpecificSeq<u128>, DefaultMultiplier, XslRr, false>;

type ExtOneseqXshRr6432 = Extended<u64, u32, OneSeq, DefaultMultiplier, XshRr, true>;
type ExtSetseqXshRr6432 = Extended<u64, u32, SpecificSeq<u64>, DefaultMultiplier, XshRr, true>;
type ExtOneseqXshRr168 = Extended<u16, u8, OneSeq, DefaultMultiplier, XshRr, true>;
type ExtMcgXshRs6432 = Extended<u64, u32, NoStream, DefaultMultiplier, XshRs, true>;
type ExtMcgXshRr168 = Extended<u16, u8, NoStream, DefaultMultiplier, XshRr, true>;
type ExtSetseqXslRr12864 = Extended<u128, u64, SpecificSeq<u128>, DefaultMultiplier, XslRr, false>;

fn selfinit_setseq(table_pow2: u32, advance_pow2: u32, kdd: bool) -> ExtSetseqXshRr6432 {
    let base = SetseqXshRr6432::with_stream(42, 54);
    Extended::with_base(base, table_pow2, advance_pow2, kdd, TableSource::SelfInit).unwrap()
}

#[test]
fn test_extended_setseq_64_32_reference() {
    // Numbers determined using `pcg_detail::extended` over
    // `setseq_xsh_rr_64_32` from pcg-cpp, seeded (42, 54), table size 2,
    // tick every 2^16 steps.
    let mut rng = selfinit_setseq(1, 16, true);

    let mut results = [0u32; 12];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u32; 12] = [
        0x23ad_45d5, 0x6e2b_9c53, 0x23cf_9e33, 0x24e9_0350,
        0x7a16_0dc4, 0x5cfe_b7ad, 0xaed2_bb60, 0xb806_c9c4,
        0x7171_55b8, 0x9de4_b820, 0xb7a8_2e49, 0xb99d_7db6,
    ];
    assert_eq!(results, expected);

    let mut rng = selfinit_setseq(1, 16, true);
    rng.advance(100_000).unwrap();
    let mut results = [0u32; 4];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u32; 4] = [0x9494_1433, 0xf6d8_4c8f, 0xf258_7344, 0xa300_71a3];
    assert_eq!(results, expected);
}

#[test]
fn test_extended_setseq_64_32_from_seed() {
    #[rustfmt::skip]
    let seed = [1,2,3,4, 5,6,7,8, 9,10,11,12, 13,14,15,16];
    let base = SetseqXshRr6432::from_seed(seed);
    let mut rng =
        ExtSetseqXshRr6432::with_base(base, 1, 16, true, TableSource::SelfInit).unwrap();

    let mut results = [0u32; 6];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u32; 6] = [
        0xed9b_3a87, 0xafb8_a93d, 0x33fe_9789, 0x7877_e2fe, 0xa5e9_87c2, 0x9fa2_556f,
    ];
    assert_eq!(results, expected);
}

#[test]
fn test_extended_oneseq_64_32_reference() {
    // Table size 4, tick every 16 steps; 40 outputs cover two ticks.
    let base = OneseqXshRr6432::new(42);
    let mut rng = ExtOneseqXshRr6432::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap();

    let mut results = [0u32; 40];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u32; 40] = [
        0x6985_d8ac, 0xc623_2379, 0x5fb6_0dbe, 0xc040_3baa,
        0x17c8_f459, 0x74e2_c42f, 0x4b2a_a329, 0xd727_8c0f,
        0xaa72_daa9, 0x597d_12b1, 0xfe8c_042f, 0x0411_89dd,
        0x5443_98db, 0x96e4_891e, 0x0b78_72bd, 0xf6f8_188e,
        0xe5d9_0428, 0xa685_5771, 0x349e_c576, 0x8c13_f5b8,
        0x619e_3952, 0xc7d1_2c41, 0x920a_5a04, 0x9c0d_1608,
        0xe859_1622, 0x136d_66ba, 0x84d4_a5a6, 0xcc2e_f726,
        0xd6b8_b427, 0xfae8_2759, 0x946e_358a, 0x0f2d_53af,
        0x3271_2004, 0x7759_0b07, 0xc049_4cb2, 0x3a0c_49fb,
        0x396d_913d, 0x2cb2_572d, 0x87d8_3dcf, 0x68ac_a909,
    ];
    assert_eq!(results, expected);
}

#[test]
fn test_extended_tock_16_8_reference() {
    // A 16-bit base wraps quickly, so the whole-period tock machinery is
    // reachable in tests.
    let base = OneseqXshRr168::new(42);
    let mut rng = ExtOneseqXshRr168::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap();

    let mut results = [0u8; 24];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u8; 24] = [
        0xdb, 0x86, 0xeb, 0xfe, 0xc9, 0x07, 0x9d, 0x0f, 0x86, 0xdf, 0xd7, 0xc7,
        0xa4, 0x5f, 0x09, 0x2c, 0x5a, 0xcc, 0x43, 0x12, 0xf7, 0xb7, 0x0e, 0x92,
    ];
    assert_eq!(results, expected);
}

#[test]
fn test_extended_high_bit_addressing_reference() {
    // Slot addressed by the high state bits; equidistribution is lost
    // but a slot stays live for long stretches.
    let base = SetseqXshRr6432::with_stream(42, 54);
    let mut rng = ExtSetseqXshRr6432::with_base(base, 2, 16, false, TableSource::SelfInit).unwrap();

    let mut results = [0u32; 12];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u32; 12] = [
        0x2676_d548, 0x6cd6_91ad, 0x7a16_0dc4, 0x6088_3d75,
        0xdf22_e83e, 0x81c9_0867, 0x0081_06e6, 0xa42b_7983,
        0xc658_7d17, 0xb99d_7db6, 0x3b83_e38f, 0x1d6a_1306,
    ];
    assert_eq!(results, expected);

    assert_eq!(rng.advance(10), Err(Error::UnsupportedTableJump));
    assert_eq!(rng.backstep(10), Err(Error::UnsupportedTableJump));
}

#[test]
fn test_extended_mcg_64_32_reference() {
    let base = McgXshRs6432::new(42);
    let mut rng = ExtMcgXshRs6432::with_base(base, 1, 4, true, TableSource::SelfInit).unwrap();

    let mut results = [0u32; 24];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u32; 24] = [
        0x51de_6a5f, 0x92a4_05ca, 0x77ae_b081, 0x57b2_7c21,
        0xc0fc_48b5, 0x2577_858e, 0xb0a2_2e9c, 0xf663_cc60,
        0xa278_6095, 0x7e83_1671, 0x4793_0c04, 0xe8da_284e,
        0xeaf1_20a2, 0xdbe7_3ef8, 0x232e_3321, 0x3f27_b444,
        0xcce9_207a, 0xd1cc_d755, 0x79b4_2e78, 0x2c9a_74b9,
        0xaa85_3aac, 0x414c_6470, 0x1d13_1079, 0x90dc_1a3e,
    ];
    assert_eq!(results, expected);
}

#[test]
fn test_extended_setseq_128_64_reference() {
    let base = SetseqXslRr12864::with_stream(42, 54);
    let mut rng =
        ExtSetseqXslRr12864::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap();

    let mut results = [0u64; 12];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u64; 12] = [
        0xc717_77f1_d89a_d5b9,
        0xd808_a25e_ae50_4eb7,
        0xa474_50d1_3b96_925b,
        0x32bb_bd1d_9bc9_b188,
        0xa9f8_290f_3619_487c,
        0x1c54_3583_0008_8b2a,
        0x89fe_40db_c633_e0e1,
        0x5f03_dfa3_255f_4161,
        0xd5b5_c24f_56ff_e66d,
        0x79b9_c7f3_2838_b290,
        0x4dd6_51cd_551d_4328,
        0x6d3c_f50a_952f_202a,
    ];
    assert_eq!(results, expected);
}

#[test]
fn test_extended_mcg_16_8_reference() {
    // MCG base and a 14-bit period, so tocks interact with the fixed
    // low state bits.
    let base = McgXshRr168::new(42);
    let mut rng = ExtMcgXshRr168::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap();

    let mut results = [0u8; 12];
    for i in results.iter_mut() {
        *i = rng.generate();
    }
    let expected: [u8; 12] = [
        0x0b, 0x4a, 0xe0, 0x05, 0x00, 0x27, 0x75, 0xab, 0x54, 0x36, 0x26, 0x62,
    ];
    assert_eq!(results, expected);
}

#[test]
fn test_extended_new_seeds_base() {
    let mut rng = ExtSetseqXshRr6432::new(
        1,
        16,
        true,
        SeedSource::ExplicitWithStream(42, 54),
        TableSource::SelfInit,
    )
    .unwrap();
    assert_eq!(rng.generate(), 0x23ad_45d5);
}

#[test]
fn test_extended_advance_matches_stepping() {
    let make = || {
        let base = OneseqXshRr6432::new(42);
        ExtOneseqXshRr6432::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap()
    };
    for offset in [0usize, 1, 7, 15, 16, 17, 100] {
        let mut start = make();
        for _ in 0..offset {
            start.generate();
        }
        for delta in [0u64, 1, 2, 15, 16, 17, 31, 33, 64, 100] {
            let mut jumped = start.clone();
            jumped.advance(delta).unwrap();
            let mut stepped = start.clone();
            for _ in 0..delta {
                stepped.generate();
            }
            assert_eq!(jumped, stepped, "offset {} delta {}", offset, delta);

            let mut back = stepped.clone();
            back.backstep(delta).unwrap();
            assert_eq!(back, start, "offset {} delta {}", offset, delta);
        }
    }
}

#[test]
fn test_extended_mcg_advance_matches_stepping() {
    let make = || {
        let base = McgXshRs6432::new(42);
        ExtMcgXshRs6432::with_base(base, 1, 4, true, TableSource::SelfInit).unwrap()
    };
    for offset in [0usize, 3, 16, 33] {
        let mut start = make();
        for _ in 0..offset {
            start.generate();
        }
        for delta in [0u64, 1, 15, 16, 17, 64, 100] {
            let mut jumped = start.clone();
            jumped.advance(delta).unwrap();
            let mut stepped = start.clone();
            for _ in 0..delta {
                stepped.generate();
            }
            assert_eq!(jumped, stepped, "offset {} delta {}", offset, delta);

            let mut back = stepped.clone();
            back.backstep(delta).unwrap();
            assert_eq!(back, start, "offset {} delta {}", offset, delta);
        }
    }
}

#[test]
fn test_extended_128_advance_matches_stepping() {
    let make = || {
        let base = SetseqXslRr12864::with_stream(42, 54);
        ExtSetseqXslRr12864::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap()
    };
    let mut start = make();
    for _ in 0..15 {
        start.generate();
    }
    for delta in [1u128, 16, 33, 100] {
        let mut jumped = start.clone();
        jumped.advance(delta).unwrap();
        let mut stepped = start.clone();
        for _ in 0..delta {
            stepped.generate();
        }
        assert_eq!(jumped, stepped, "delta {}", delta);

        let mut back = stepped.clone();
        back.backstep(delta).unwrap();
        assert_eq!(back, start, "delta {}", delta);
    }
}

#[test]
fn test_extended_tock_crossing() {
    // A full 16-bit base period passes the zero state exactly once and
    // must tock the table along the way, in both directions.
    let make = || {
        let base = OneseqXshRr168::new(42);
        ExtOneseqXshRr168::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap()
    };
    let mut jumped = make();
    jumped.advance(65_535).unwrap();
    jumped.advance(1).unwrap();
    let mut stepped = make();
    for _ in 0..65_536u32 {
        stepped.generate();
    }
    assert_eq!(jumped, stepped);

    let mut back = stepped;
    back.backstep(1).unwrap();
    back.backstep(65_535).unwrap();
    assert_eq!(back, make());
}

#[test]
fn test_extended_mcg_tock_crossing() {
    // The MCG period is a quarter of the state space: 2^14 steps.
    let make = || {
        let base = McgXshRr168::new(42);
        ExtMcgXshRr168::with_base(base, 2, 4, true, TableSource::SelfInit).unwrap()
    };
    let mut jumped = make();
    jumped.advance(16_384).unwrap();
    let mut stepped = make();
    for _ in 0..16_384u32 {
        stepped.generate();
    }
    assert_eq!(jumped, stepped);

    let mut back = stepped;
    back.backstep(16_384).unwrap();
    assert_eq!(back, make());
}

#[test]
fn test_extended_set_plants_values() {
    // The signature trick: plant outputs, rewind, watch them come out.
    let base = SetseqXshRr6432::with_stream(42, 54);
    let mut rng = ExtSetseqXshRr6432::with_base(base, 3, 16, true, TableSource::SelfInit).unwrap();
    let wanted: [u32; 4] = [0x1111_1111, 0x2222_2222, 0x3333_3333, 0x4444_4444];
    for w in wanted {
        rng.set(w);
    }
    rng.backstep(4).unwrap();
    let mut got = [0u32; 4];
    for g in got.iter_mut() {
        *g = rng.generate();
    }
    assert_eq!(got, wanted);
}

#[test]
fn test_extended_data_table_and_no_ticks() {
    // An advance unit as wide as the state never ticks, and a 64-bit
    // base never tocks, so a zero table leaves the sequence untouched.
    let base = OneseqXshRr6432::new(42);
    let mut ext =
        ExtOneseqXshRr6432::with_base(base, 1, 64, true, TableSource::Data(&[0, 0])).unwrap();
    let mut plain = OneseqXshRr6432::new(42);
    for _ in 0..16 {
        assert_eq!(ext.generate(), plain.generate());
    }
}

#[test]
fn test_extended_wrong_table_size() {
    let base = OneseqXshRr6432::new(1);
    let result = ExtOneseqXshRr6432::with_base(base, 2, 16, true, TableSource::Data(&[1, 2, 3]));
    assert_eq!(result, Err(Error::WrongTableSize));
}

#[test]
#[should_panic]
fn test_extended_zero_table_panics() {
    let base = OneseqXshRr6432::new(1);
    let _ = ExtOneseqXshRr6432::with_base(base, 0, 16, true, TableSource::SelfInit);
}

#[test]
fn test_extended_queries() {
    let rng = selfinit_setseq(2, 16, true);
    assert_eq!(rng.period_pow2(), 64 + 4 * 32);
    assert_eq!(rng.byte_size(), 16 + 4 * 4);
}

#[cfg(feature = "getrandom")]
#[test]
fn test_extended_entropy_table() {
    let mut rng1 = ExtSetseqXshRr6432::new(2, 16, true, SeedSource::Entropy, TableSource::Entropy)
        .unwrap();
    let rng2 = ExtSetseqXshRr6432::new(2, 16, true, SeedSource::Entropy, TableSource::Entropy)
        .unwrap();
    assert_ne!(rng1, rng2);
    rng1.generate();
}

#[cfg(feature = "serde1")]
#[test]
fn test_extended_serde() {
    use bincode;
    use std::io::{BufReader, BufWriter};

    let mut rng = selfinit_setseq(2, 16, true);
    for _ in 0..7 {
        rng.generate();
    }

    let buf: Vec<u8> = Vec::new();
    let mut buf = BufWriter::new(buf);
    bincode::serialize_into(&mut buf, &rng).expect("Could not serialize");

    let buf = buf.into_inner().unwrap();
    let mut read = BufReader::new(&buf[..]);
    let mut deserialized: ExtSetseqXshRr6432 =
        bincode::deserialize_from(&mut read).expect("Could not deserialize");

    for _ in 0..16 {
        assert_eq!(rng.generate(), deserialized.generate());
    }
}
