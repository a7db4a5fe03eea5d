//! NTT butterfly stage and vector kernel benchmarks.

use bls12_381_scalar_field::{ntt_round, vec_add, vec_mul, MontScalar, Scalar};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SIZE: usize = 1 << 12;

fn sample_vec(seed: u64) -> std::vec::Vec<MontScalar> {
    (0..SIZE)
        .map(|i| Scalar::from_u64(seed.wrapping_add(i as u64)).to_mont())
        .collect()
}

fn bench_vec_add(c: &mut Criterion) {
    let a = sample_vec(1);
    let b = sample_vec(2);
    let mut out = a.clone();
    c.bench_function("vec_add/4096", |bencher| {
        bencher.iter(|| vec_add(black_box(&mut out), black_box(&a), black_box(&b)))
    });
}

fn bench_vec_mul(c: &mut Criterion) {
    let a = sample_vec(1);
    let b = sample_vec(2);
    let mut out = a.clone();
    c.bench_function("vec_mul/4096", |bencher| {
        bencher.iter(|| vec_mul(black_box(&mut out), black_box(&a), black_box(&b)))
    });
}

fn bench_ntt_round(c: &mut Criterion) {
    let mut coeffs = sample_vec(1);
    let twiddles = sample_vec(3);
    c.bench_function("ntt_round/m=2/n=4096", |bencher| {
        bencher.iter(|| ntt_round(black_box(&mut coeffs), black_box(&twiddles[..1]), 2))
    });
}

criterion_group!(benches, bench_vec_add, bench_vec_mul, bench_ntt_round);
criterion_main!(benches);
