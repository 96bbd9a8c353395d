use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_cleaner::categorical::CategoricalNormalizer;
use csv_cleaner::data::{Cell, Column};

const OCCUPATIONS: &[&str] = &[
    "teacher", "techer", "doctor", "docter", "farmer", "famer", "engineer", "enginer", "nurse",
    "nurze", "driver", "drivr",
];

fn occupation_column(rows: usize) -> Column {
    let cells = (0..rows)
        .map(|i| Cell::text(OCCUPATIONS[i % OCCUPATIONS.len()]))
        .collect();
    Column::new("occupation", cells)
}

fn bench_categorical_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("categorical_correction");

    // A fresh normalizer per iteration pays for every distinct token once.
    group.bench_function("cold_cache_10k_rows", |b| {
        b.iter_batched(
            || (CategoricalNormalizer::builtin(), occupation_column(10_000)),
            |(normalizer, mut column)| {
                normalizer.normalize_column(&mut column, false);
            },
            BatchSize::SmallInput,
        );
    });

    let warm = CategoricalNormalizer::builtin();
    let mut primer = occupation_column(OCCUPATIONS.len());
    warm.normalize_column(&mut primer, false);
    group.bench_function("warm_cache_10k_rows", |b| {
        b.iter_batched(
            || occupation_column(10_000),
            |mut column| {
                warm.normalize_column(&mut column, false);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_categorical_cache);
criterion_main!(benches);
