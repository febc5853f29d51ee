//! WorkQueue throughput benchmarks.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use axpipe_core::queue::WorkQueue;
use axpipe_core::stop::StopFlag;

fn bench_push_pop(c: &mut Criterion) {
    c.bench_function("queue_push_pop_1k", |b| {
        // Pre-set stop so pop_drain never parks on an empty queue.
        let stop = StopFlag::new();
        stop.set();
        b.iter_batched(
            WorkQueue::new,
            |q| {
                for i in 0..1_000i32 {
                    q.push(i);
                }
                while q.pop_drain(&stop).is_some() {}
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_push(c: &mut Criterion) {
    c.bench_function("queue_push", |b| {
        let q = WorkQueue::new();
        let mut i = 0i32;
        b.iter(|| {
            q.push(i);
            i = i.wrapping_add(1);
        });
    });
}

criterion_group!(benches, bench_push_pop, bench_push);
criterion_main!(benches);
