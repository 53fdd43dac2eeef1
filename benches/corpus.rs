use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rangefix::corpus;

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("corpus build", |b| {
        b.iter(|| corpus::build_corpus(black_box(42)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
