//! Hot-loop timing of the public operations under auto and forced-scalar
//! dispatch.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simdist::Backend;

const LEN: usize = 1024;

fn inputs() -> (Vec<f32>, Vec<f32>, Vec<u8>, Vec<u8>, Vec<u16>, Vec<u16>) {
  let a: Vec<f32> = (0..LEN).map(|i| (i as f32).sin() * 10.0).collect();
  let b: Vec<f32> = (0..LEN).map(|i| (i as f32).cos() * 10.0).collect();
  let bytes_a: Vec<u8> = (0..LEN).map(|i| (i * 37) as u8).collect();
  let bytes_b: Vec<u8> = (0..LEN).map(|i| (i * 101 + 5) as u8).collect();
  let words_a: Vec<u16> = (0..LEN).map(|i| (i * 7919) as u16).collect();
  let words_b: Vec<u16> = (0..LEN).map(|i| (i * 104729 + 13) as u16).collect();
  (a, b, bytes_a, bytes_b, words_a, words_b)
}

fn bench_under(c: &mut Criterion, label: &str, choice: Backend) {
  simdist::set_backend(choice);
  let (a, b, bytes_a, bytes_b, words_a, words_b) = inputs();

  let mut group = c.benchmark_group(label);
  group.bench_function("sqeuclidean/1024", |bench| {
    bench.iter(|| simdist::dist_sqeuclidean_f32(black_box(&a), black_box(&b)).unwrap());
  });
  group.bench_function("manhattan/1024", |bench| {
    bench.iter(|| simdist::dist_manhattan_f32(black_box(&a), black_box(&b)).unwrap());
  });
  group.bench_function("dot/1024", |bench| {
    bench.iter(|| simdist::sim_dot_f32(black_box(&a), black_box(&b)).unwrap());
  });
  group.bench_function("cosine/1024", |bench| {
    bench.iter(|| simdist::sim_cosine_f32(black_box(&a), black_box(&b)).unwrap());
  });
  group.bench_function("hamming/1024", |bench| {
    bench.iter(|| simdist::dist_hamming_u8(black_box(&bytes_a), black_box(&bytes_b)).unwrap());
  });
  group.bench_function("jaccard/1024", |bench| {
    bench.iter(|| simdist::sim_jaccard_u16(black_box(&words_a), black_box(&words_b)).unwrap());
  });
  group.bench_function("normalize/1024", |bench| {
    bench.iter_batched(
      || a.clone(),
      |mut v| simdist::normalize_l2_f32(black_box(&mut v)).unwrap(),
      criterion::BatchSize::SmallInput,
    );
  });
  group.finish();
}

fn bench_metrics(c: &mut Criterion) {
  bench_under(c, "auto", Backend::Auto);
  bench_under(c, "scalar", Backend::Scalar);
  simdist::set_backend(Backend::Auto);
}

criterion_group!(benches, bench_metrics);
criterion_main!(benches);
