//! RRF merge benchmarks at two corpus sizes, mirroring the retrieval
//! benchmarks this crate's hybrid search depends on.

use std::collections::BTreeMap;

use criterion::{criterion_group, criterion_main, Criterion};

use covenant_retrieval::{merge, RrfCandidate};

fn make_candidates(n: usize, contract_id: &str) -> Vec<RrfCandidate> {
    (0..n)
        .map(|i| RrfCandidate {
            contract_id: contract_id.to_string(),
            content: format!("clause text number {i} with some representative content"),
            score: 1.0 - (i as f64 / n as f64),
            metadata: BTreeMap::new(),
        })
        .collect()
}

fn bench_merge(c: &mut Criterion, n: usize, label: &str) {
    let vector = make_candidates(n, "contract-a");
    let mut graph = make_candidates(n, "contract-a");
    graph.reverse();

    c.bench_function(label, |b| {
        b.iter(|| merge(&vector, &graph, 60.0));
    });
}

fn bench_merge_100(c: &mut Criterion) {
    bench_merge(c, 100, "rrf_merge_100");
}

fn bench_merge_5k(c: &mut Criterion) {
    bench_merge(c, 5_000, "rrf_merge_5k");
}

criterion_group!(benches, bench_merge_100, bench_merge_5k);
criterion_main!(benches);
