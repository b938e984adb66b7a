use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::collections::BTreeSet;
use treap_sort::sort::{heap_sort, treap_sort};
use treap_sort::treap::{TreapMultiset, TreapSet};

const NUM_OF_OPERATIONS: usize = 1000;

fn values() -> Vec<u32> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u32()).collect()
}

fn bench_multiset_insert(c: &mut Criterion) {
    let values = values();
    c.bench_function("bench treap multiset insert", move |b| {
        b.iter(|| {
            let mut multiset = TreapMultiset::with_seed([2, 2, 2, 2]);
            for value in &values {
                multiset.insert(*value);
            }
            black_box(multiset)
        })
    });
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let values = values();
    c.bench_function("bench btreeset insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for value in &values {
                set.insert(*value);
            }
            black_box(set)
        })
    });
}

fn bench_set_union(c: &mut Criterion) {
    let values = values();
    let (left, right) = values.split_at(NUM_OF_OPERATIONS / 2);
    let left: TreapSet<u32> = left.iter().cloned().collect();
    let right: TreapSet<u32> = right.iter().cloned().collect();
    c.bench_function("bench treap set union", move |b| {
        b.iter(|| black_box(&left | &right))
    });
}

fn bench_heap_sort(c: &mut Criterion) {
    let values = values();
    c.bench_function("bench heap sort", move |b| {
        b.iter(|| black_box(heap_sort(values.clone(), false).collect::<Vec<u32>>()))
    });
}

fn bench_heap_sort_prefix(c: &mut Criterion) {
    let values = values();
    c.bench_function("bench heap sort first ten", move |b| {
        b.iter(|| black_box(heap_sort(values.clone(), false).take(10).collect::<Vec<u32>>()))
    });
}

fn bench_treap_sort(c: &mut Criterion) {
    let values = values();
    c.bench_function("bench treap sort", move |b| {
        b.iter(|| black_box(treap_sort(values.clone(), false).collect::<Vec<u32>>()))
    });
}

criterion_group!(
    benches,
    bench_multiset_insert,
    bench_btreeset_insert,
    bench_set_union,
    bench_heap_sort,
    bench_heap_sort_prefix,
    bench_treap_sort,
);
criterion_main!(benches);
