use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fitsedit::heliocentric::heliocentric_julian_date;
use fitsedit::params::EditorParams;

/// Random JD over 1950-2050 and random sky positions.
fn bench_random_targets(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);
    let params = EditorParams::default();
    let samples = 10_000usize;

    c.bench_function("heliocentric_julian_date/random_targets", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        let jd = rng.random_range(2_433_282.5..2_469_807.5);
                        let ra = rng.random_range(0.0..360.0);
                        let dec = rng.random_range(-90.0..=90.0);
                        (jd, ra, dec)
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (jd, ra, dec) in cases {
                    let hjd = heliocentric_julian_date(
                        black_box(jd),
                        black_box(ra),
                        black_box(dec),
                        &params,
                    )
                    .unwrap();
                    black_box(hjd);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_random_targets);
criterion_main!(benches);
