//! Tick generation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graficar_scale::{DataBounds, LinearScale, LogarithmicScale, Scale, ScaleOptions};

fn bench_ticks(c: &mut Criterion) {
    c.bench_function("linear_build_ticks", |b| {
        let mut scale = LinearScale::new(ScaleOptions::default());
        scale.set_data_bounds(&DataBounds::from_range(-1234.5, 98_765.4));
        b.iter(|| {
            scale.build_ticks();
            black_box(scale.ticks().len())
        });
    });

    c.bench_function("linear_build_ticks_cached_labels", |b| {
        let mut scale = LinearScale::new(ScaleOptions::default());
        scale.set_data_bounds(&DataBounds::from_range(0.0, 100.0));
        scale.build_ticks();
        b.iter(|| {
            scale.build_ticks();
            black_box(scale.ticks().len())
        });
    });

    c.bench_function("log_build_ticks", |b| {
        let mut scale = LogarithmicScale::new(ScaleOptions::default());
        scale.set_data_bounds(&DataBounds::from_range(0.001, 1.0e9));
        b.iter(|| {
            scale.build_ticks();
            black_box(scale.ticks().len())
        });
    });

    c.bench_function("nice_num", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 1..100 {
                acc += graficar_scale::nice_num(f64::from(i) * 0.37, true);
            }
            black_box(acc)
        });
    });
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
