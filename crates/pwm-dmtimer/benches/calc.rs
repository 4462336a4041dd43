use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pwm_dmtimer::calc::{counter_value, LoadMatch};

fn bench_calc(c: &mut Criterion) {
    c.bench_function("counter_value", |b| {
        b.iter(|| counter_value(black_box(24_000_000), black_box(1_000_000)))
    });

    c.bench_function("load_match", |b| {
        b.iter(|| {
            LoadMatch::compute(
                black_box(24_000_000),
                black_box(250_000),
                black_box(1_000_000),
            )
        })
    });
}

criterion_group!(benches, bench_calc);
criterion_main!(benches);
