use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cg_core::{CandidateBlock, Settings};
use cg_session::{CaptureSession, DeduplicationIndex, IgnoreSet};

fn blocks(n: usize, distinct: usize) -> Vec<CandidateBlock> {
    (0..n)
        .map(|i| CandidateBlock::new(format!("fn item_{}() {{ compute({}); }}", i % distinct, i % distinct), i))
        .collect()
}

fn bench_dedup(c: &mut Criterion) {
    let contents: Vec<String> = (0..1000).map(|i| format!("let x{} = {};", i % 100, i % 100)).collect();
    c.bench_function("dedup_admit_1000_100_distinct", |b| {
        b.iter(|| {
            let mut index = DeduplicationIndex::new();
            let ignore = IgnoreSet::new();
            for content in &contents {
                black_box(index.admit(content, &ignore, true));
            }
        })
    });
}

fn bench_pass(c: &mut Criterion) {
    let settings = Settings { min_content_len: 0, ..Settings::default() };
    let input = blocks(500, 50);
    c.bench_function("session_pass_500_blocks", |b| {
        b.iter(|| {
            let mut session = CaptureSession::new(settings.clone());
            black_box(session.run_pass(black_box(&input)).len());
        })
    });
}

criterion_group!(benches, bench_dedup, bench_pass);
criterion_main!(benches);
