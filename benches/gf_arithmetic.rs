//! Benchmarks for finite field arithmetic and forward iteration.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use aiip::gf::FieldContext;
use aiip::AiipInstance;

fn bench_gf_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("GF Multiplication");

    for order in [131_071u64, 256, 6561, 15_625] {
        let gf = FieldContext::from_order(order).unwrap();

        group.bench_with_input(BenchmarkId::new("order", order), &gf, |b, gf| {
            let a = gf.element(3);
            let b_elem = gf.element(order - 2);
            b.iter(|| {
                let mut result = a.clone();
                for _ in 0..100 {
                    result = result.mul(&b_elem);
                }
                result
            });
        });
    }

    group.finish();
}

fn bench_gf_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("GF Creation");

    for order in [256u64, 6561, 15_625, 117_649] {
        group.bench_with_input(BenchmarkId::new("order", order), &order, |b, &order| {
            b.iter(|| FieldContext::from_order(order).unwrap());
        });
    }

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("Iteration");

    for depth in [4usize, 16, 24] {
        let field = FieldContext::prime(131_071u32).unwrap();
        let instance = AiipInstance::new(field.clone(), field.element(5), depth).unwrap();
        let x = field.element(123);

        group.bench_with_input(BenchmarkId::new("depth", depth), &instance, |b, instance| {
            b.iter(|| instance.iterate(&x).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gf_multiplication, bench_gf_creation, bench_iteration);
criterion_main!(benches);
