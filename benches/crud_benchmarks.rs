use arbor_btree::BTree;
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;

const N: usize = 10_000;

/// Branching factors compared against `BTreeMap`; small orders stress rebalancing.
const ORDERS: [usize; 3] = [3, 16, 64];

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn build_tree(order: usize, keys: &[i64]) -> BTree<i64, i64> {
    let mut tree = BTree::new(order).unwrap();
    tree.extend(keys.iter().map(|&k| (k, k)));
    tree
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    for order in ORDERS {
        group.bench_function(BenchmarkId::new(format!("BTree/order={order}"), N), |b| {
            b.iter(|| build_tree(order, keys));
        });
    }

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>());
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "insert_random", &random_keys(N));
}

fn bench_search_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let mut group = c.benchmark_group("search_random");

    for order in ORDERS {
        let tree = build_tree(order, &keys);
        group.bench_function(BenchmarkId::new(format!("BTree/order={order}"), N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for k in &keys {
                    if let Ok(&v) = tree.search(k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = bt_map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("remove_random");

    for order in ORDERS {
        let tree = build_tree(order, &keys);
        group.bench_function(BenchmarkId::new(format!("BTree/order={order}"), N), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for k in &keys {
                        let _ = tree.remove(k);
                    }
                    tree
                },
                BatchSize::LargeInput,
            );
        });
    }

    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || bt_map.clone(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let mut group = c.benchmark_group("traverse");

    for order in ORDERS {
        let tree = build_tree(order, &keys);
        group.bench_function(BenchmarkId::new(format!("BTree/order={order}"), N), |b| {
            b.iter(|| black_box(tree.traverse()).len());
        });
    }

    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| black_box(bt_map.iter().collect::<Vec<_>>()).len());
    });

    group.finish();
}

criterion_group!(insert_benches, bench_insert_ordered, bench_insert_random,);

criterion_group!(lookup_benches, bench_search_random, bench_traverse,);

criterion_group!(remove_benches, bench_remove_random,);

criterion_main!(insert_benches, lookup_benches, remove_benches,);
