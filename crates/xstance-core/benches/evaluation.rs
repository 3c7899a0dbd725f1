use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xstance_core::evaluate::evaluate;
use xstance_core::metrics::macro_f1;
use xstance_core::model::{PredictionRecord, RawLabel, Record};

const TEST_SETS: [&str; 4] = [
    "new_comments_defr",
    "new_questions_defr",
    "new_topics_defr",
    "new_comments_it",
];

fn make_gold(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            label: Some(RawLabel::from(if i % 3 == 0 { "AGAINST" } else { "FAVOR" })),
            language: Some(["de", "fr", "it"][i % 3].into()),
            test_set: Some(TEST_SETS[i % 4].into()),
            ..Default::default()
        })
        .collect()
}

fn make_pred(n: usize) -> Vec<PredictionRecord> {
    (0..n)
        .map(|i| PredictionRecord::new(if i % 2 == 0 { "AGAINST" } else { "FAVOR" }))
        .collect()
}

fn bench_macro_f1(c: &mut Criterion) {
    let gold: Vec<String> = (0..10_000)
        .map(|i| if i % 3 == 0 { "AGAINST" } else { "FAVOR" }.to_string())
        .collect();
    let pred: Vec<String> = (0..10_000)
        .map(|i| if i % 2 == 0 { "AGAINST" } else { "FAVOR" }.to_string())
        .collect();

    c.bench_function("macro_f1_10k", |b| {
        b.iter(|| macro_f1(black_box(&gold), black_box(&pred)).unwrap())
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let gold = make_gold(17_000);
    let pred = make_pred(17_000);

    c.bench_function("evaluate_17k", |b| {
        b.iter(|| evaluate(black_box(&gold), black_box(&pred)))
    });
}

criterion_group!(benches, bench_macro_f1, bench_evaluate);
criterion_main!(benches);
