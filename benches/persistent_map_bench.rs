use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{thread_rng, Rng};

use rbtree_history::PersistentMap;

pub fn seq_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("seq_insert", |b| {
        let mut map: PersistentMap<u64, u64> = PersistentMap::new();
        let mut key = 0u64;
        b.iter(|| {
            *map.insert(key) = key;
            key += 1;
        })
    });
    group.finish();
}

pub fn rand_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("rbtree_history", |b| {
        let mut map: PersistentMap<u64, u64> = PersistentMap::new();
        let mut rng = thread_rng();
        b.iter(|| {
            let key = rng.gen_range(0..1_000_000u64);
            *map.insert(key) = key;
        })
    });
    group.finish();
}

pub fn seq_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_delete");
    group.throughput(Throughput::Elements(1));
    group.bench_function("seq_delete", |b| {
        b.iter_custom(|iters| {
            let mut map: PersistentMap<u64, u64> = PersistentMap::new();
            for i in 0..iters {
                *map.insert(i) = i;
            }
            let start = std::time::Instant::now();
            for i in 0..iters {
                map.delete(&i);
            }
            start.elapsed()
        })
    });
    group.finish();
}

pub fn rand_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_get");
    group.throughput(Throughput::Elements(1));
    let size = 100_000u64;
    group.bench_function("rbtree_history", |b| {
        let mut map: PersistentMap<u64, u64> = PersistentMap::new();
        for i in 0..size {
            *map.insert(i) = i;
        }
        let mut rng = thread_rng();
        b.iter(|| {
            let key = rng.gen_range(0..size);
            criterion::black_box(map.search(&key));
        })
    });
    group.finish();
}

pub fn rewind_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewind_churn");
    group.throughput(Throughput::Elements(1));
    group.bench_function("rbtree_history", |b| {
        let mut map: PersistentMap<u64, u64> = PersistentMap::new();
        for i in 0..1000u64 {
            *map.insert(i) = i;
        }
        b.iter(|| {
            map.rewind(1).unwrap();
            *map.insert(0) = 0;
        })
    });
    group.finish();
}

criterion_group!(insert_benches, seq_insert, rand_insert);
criterion_group!(delete_benches, seq_delete);
criterion_group!(query_benches, rand_get, rewind_churn);
criterion_main!(insert_benches, delete_benches, query_benches);
