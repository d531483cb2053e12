//! Safety checker benchmark.
//!
//! Measures `safe_sequence` on worst-case orderings, where every scan finds
//! only the last unfinished process satisfiable (O(P²·R)).

use banker_arbiter::kernel::safety::safe_sequence;
use banker_arbiter::Units;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Process `i` can only finish after every process above it has.
fn reverse_chain(processes: usize, resources: usize) -> (Vec<Units>, Vec<Vec<Units>>, Vec<Vec<Units>>) {
    let available = vec![1; resources];
    let allocation = vec![vec![1; resources]; processes];
    let need = (0..processes)
        .map(|i| vec![(processes - i) as Units; resources])
        .collect();
    (available, allocation, need)
}

fn bench_safe_sequence(c: &mut Criterion) {
    let sizes: &[usize] = &[8, 32, 128, 512];

    let mut group = c.benchmark_group("safe_sequence");
    for &processes in sizes {
        let (available, allocation, need) = reverse_chain(processes, 4);
        group.bench_with_input(BenchmarkId::from_parameter(processes), &processes, |b, _| {
            b.iter(|| {
                safe_sequence(
                    black_box(&available),
                    black_box(&allocation),
                    black_box(&need),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_safe_sequence);
criterion_main!(benches);
