// Copyright 2018-2021 Developers of the Rand project.
// Copyright 2014-2017, 2019 Melissa O'Neill and PCG Project contributors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::mem::size_of;
use core::time::Duration;
use criterion::{criterion_group, criterion_main, Criterion};
use pcg_engines::{
    bounded_rand, DefaultMultiplier, Engine, Extended, NoStream, OneSeq, RxsMXs, SpecificSeq,
    TableSource, XshRr, XshRs, XslRr,
};
use rand_core::RngCore;

type OneseqXshRr6432 = Engine<u64, u32, OneSeq, DefaultMultiplier, XshRr, true>;
type SetseqXshRr6432 = Engine<u64, u32, SpecificSeq<u64>, DefaultMultiplier, XshRr, true>;
type McgXshRs6432 = Engine<u64, u32, NoStream, DefaultMultiplier, XshRs, true>;
type OneseqRxsMXs6464 = Engine<u64, u64, OneSeq, DefaultMultiplier, RxsMXs, true>;
type SetseqXslRr12864 = Engine<u128, u64, SpecificSeq<u128>, DefaultMultiplier, XslRr, false>;
type McgXslRr12864 = Engine<u128, u64, NoStream, DefaultMultiplier, XslRr, false>;

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench
);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("generation");
    g.sample_size(1000);
    g.warm_up_time(Duration::from_millis(500));
    g.measurement_time(Duration::from_millis(1000));

    macro_rules! do_engine {
        ($name:literal, $out:ty, $make:expr) => {
            g.throughput(criterion::Throughput::Bytes(size_of::<$out>() as u64));
            g.bench_function($name, |b| {
                let mut rng = $make;
                b.iter(|| rng.generate())
            });
        };
    }

    do_engine!("oneseq_xsh_rr_64_32", u32, OneseqXshRr6432::new(42));
    do_engine!(
        "setseq_xsh_rr_64_32",
        u32,
        SetseqXshRr6432::with_stream(42, 54)
    );
    do_engine!("mcg_xsh_rs_64_32", u32, McgXshRs6432::new(42));
    do_engine!("oneseq_rxs_m_xs_64_64", u64, OneseqRxsMXs6464::new(42));
    do_engine!(
        "setseq_xsl_rr_128_64",
        u64,
        SetseqXslRr12864::with_stream(42, 54)
    );
    do_engine!("mcg_xsl_rr_128_64", u64, McgXslRr12864::new(42));
    do_engine!(
        "extended_setseq_xsh_rr_64_32_k1024",
        u32,
        Extended::with_base(
            SetseqXshRr6432::with_stream(42, 54),
            10,
            16,
            true,
            TableSource::SelfInit
        )
        .unwrap()
    );

    g.throughput(criterion::Throughput::Bytes(1024));
    g.bench_function("fill_bytes_setseq_xsh_rr_64_32", |b| {
        let mut rng = SetseqXshRr6432::with_stream(42, 54);
        let mut buf = [0u8; 1024];
        b.iter(|| rng.fill_bytes(&mut buf))
    });

    g.throughput(criterion::Throughput::Elements(1));
    g.bench_function("bounded_rand_small", |b| {
        let mut rng = OneseqXshRr6432::new(42);
        b.iter(|| bounded_rand(&mut rng, 6))
    });
    g.bench_function("bounded_rand_large", |b| {
        let mut rng = OneseqXshRr6432::new(42);
        b.iter(|| bounded_rand(&mut rng, 0xe000_0001))
    });

    g.finish();
}
