//! Benchmarks for the notification path.
//!
//! Run with: cargo bench -p snapwatch

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use snapwatch::{ReducerStore, Subscription, aggregate};
use std::hint::black_box;
use std::rc::Rc;

type Counter = ReducerStore<i64, i64>;

/// Bind `n` linear transforms of a counter; every dispatch changes all of them.
fn bind_changing(n: i64) -> Rc<Counter> {
    let store = Rc::new(ReducerStore::new(0, |s: &i64, d: i64| s + d));
    let subs: Vec<_> = (1..=n)
        .map(|k| Subscription::new(move |s: &i64| s * k, |new, _| {
            black_box(new);
        })
        .shared())
        .collect();
    let _binding = aggregate(&subs).bind(Some(&store)).ok();
    store
}

/// Bind `n` constant selectors; dispatches never fire a handler.
fn bind_unchanged(n: usize) -> Rc<Counter> {
    let store = Rc::new(ReducerStore::new(0, |s: &i64, d: i64| s + d));
    let subs: Vec<_> = (0..n)
        .map(|_| Subscription::new(|_: &i64| 0u8, |_, _| {}).shared())
        .collect();
    let _binding = aggregate(&subs).bind(Some(&store)).ok();
    store
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify/dispatch");

    for n in [1, 10, 100, 1000] {
        let store = bind_changing(n);
        group.bench_with_input(BenchmarkId::new("all_changed", n), &store, |b, store| {
            b.iter(|| store.dispatch(black_box(1)))
        });

        let store = bind_unchanged(n as usize);
        group.bench_with_input(BenchmarkId::new("none_changed", n), &store, |b, store| {
            b.iter(|| store.dispatch(black_box(1)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
