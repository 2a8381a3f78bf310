use bitbloom::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

pub fn bitset_bench(c: &mut Criterion) {
    let mut bits = PackedBitSet::new(1024).unwrap();

    c.bench_function("bitset_set", |b| b.iter(|| bits.set(black_box(42))));
    c.bench_function("bitset_clear", |b| b.iter(|| bits.clear(black_box(42))));
    c.bench_function("bitset_get_hit", |b| {
        bits.set(42).unwrap();
        b.iter(|| black_box(bits.get(black_box(42))))
    });
    c.bench_function("bitset_get_miss", |b| {
        b.iter(|| black_box(bits.get(black_box(43))))
    });

    let other = PackedBitSet::new(1_000_000).unwrap();
    c.bench_function("bitset_or_1_000_000", |b| {
        b.iter_batched(
            || PackedBitSet::new(1_000_000).unwrap(),
            |mut bits| {
                bits.combine_or(&other).unwrap();
                black_box(bits)
            },
            BatchSize::LargeInput,
        )
    });
}

pub fn filter_bench(c: &mut Criterion) {
    let mut filter = MembershipFilter::new(100_000, 0.01).unwrap();

    c.bench_function("filter_put", |b| b.iter(|| filter.put(black_box("hello"))));

    c.bench_function("filter_may_contain_hit", |b| {
        b.iter(|| black_box(filter.may_contain(black_box("hello"))))
    });

    c.bench_function("filter_may_contain_miss", |b| {
        b.iter(|| black_box(filter.may_contain(black_box("goodbye"))))
    });

    c.bench_function("filter_new_100_000", |b| {
        b.iter(|| black_box(MembershipFilter::new(black_box(100_000), 0.01)))
    });

    c.bench_function("filter_merge_100_000", |b| {
        let other = filter.clone();
        b.iter_batched(
            || MembershipFilter::new(100_000, 0.01).unwrap(),
            |mut f| {
                f.merge(&other).unwrap();
                black_box(f)
            },
            BatchSize::LargeInput,
        )
    });
}

pub fn projector_bench(c: &mut Criterion) {
    for p in PROJECTORS {
        c.bench_function(&format!("projector_bucket_{}", p.name()), |b| {
            b.iter(|| black_box(p.bucket(black_box(b"hello world"), 958_506)))
        });
    }
}

criterion_group!(benches, bitset_bench, filter_bench, projector_bench);
criterion_main!(benches);
