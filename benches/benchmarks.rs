use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use stowage::{format_vip_list, MemoryStorage, Persisted, VipListState};

fn persisted_open_benchmark(c: &mut Criterion) {
    let storage = Arc::new(MemoryStorage::new());

    c.bench_function("persisted_open", |b| {
        b.iter(|| {
            let value: Persisted<i32, _> =
                Persisted::new(storage.clone(), "count", black_box(42)).unwrap();
            value
        });
    });
}

fn persisted_read_benchmark(c: &mut Criterion) {
    let value = Persisted::new(MemoryStorage::new(), "count", 42).unwrap();

    c.bench_function("persisted_read", |b| {
        b.iter(|| {
            black_box(value.get());
        });
    });
}

fn persisted_write_benchmark(c: &mut Criterion) {
    let value = Persisted::new(MemoryStorage::new(), "count", 0).unwrap();

    c.bench_function("persisted_write", |b| {
        let mut i = 0;
        b.iter(|| {
            value.set(black_box(i)).unwrap();
            i += 1;
        });
    });
}

fn vip_update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("vip_update");

    for size in [1_usize, 10, 100].iter() {
        let vips = VipListState::new(MemoryStorage::new()).unwrap();
        vips.set_names((0..*size).map(|i| format!("Guest {i}")).collect())
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                vips.push_name(black_box("Andrew")).unwrap();
                vips.remove_name(*size).unwrap();
            });
        });
    }
    group.finish();
}

fn format_vip_list_benchmark(c: &mut Criterion) {
    let names: Vec<String> = (0..100)
        .map(|i| if i % 10 == 0 { String::new() } else { format!("Guest {i}") })
        .collect();

    c.bench_function("format_vip_list", |b| {
        b.iter(|| {
            black_box(format_vip_list(black_box(names.as_slice())));
        });
    });
}

criterion_group!(
    benches,
    persisted_open_benchmark,
    persisted_read_benchmark,
    persisted_write_benchmark,
    vip_update_benchmark,
    format_vip_list_benchmark,
);
criterion_main!(benches);
