//! Results checked against naive f64 and bit-level references.

use simdist::{
  dist_hamming_u8, dist_manhattan_f32, dist_sqeuclidean_f32, normalize_l2_f32, sim_cosine_f32, sim_dot_f32,
  sim_jaccard_u16,
};

fn gen_f32(len: usize, seed: u32) -> Vec<f32> {
  // Small deterministic LCG; values in roughly [-8, 8].
  let mut state = seed.wrapping_mul(2654435761).wrapping_add(1);
  (0..len)
    .map(|_| {
      state = state.wrapping_mul(1664525).wrapping_add(1013904223);
      (state >> 16) as f32 / 4096.0 - 8.0
    })
    .collect()
}

fn gen_u8(len: usize, seed: u32) -> Vec<u8> {
  let mut state = seed.wrapping_mul(2654435761).wrapping_add(7);
  (0..len)
    .map(|_| {
      state = state.wrapping_mul(1664525).wrapping_add(1013904223);
      (state >> 13) as u8
    })
    .collect()
}

fn assert_close(got: f32, want: f64, scale: f64) {
  let tol = 1e-4 * scale.max(1.0);
  assert!(
    (f64::from(got) - want).abs() <= tol,
    "got {got}, want {want}, tol {tol}"
  );
}

const LENGTHS: [usize; 8] = [1, 3, 8, 17, 33, 64, 129, 1000];

#[test]
fn sqeuclidean_matches_f64_reference() {
  for len in LENGTHS {
    let a = gen_f32(len, 1);
    let b = gen_f32(len, 2);
    let want: f64 = a
      .iter()
      .zip(&b)
      .map(|(&x, &y)| {
        let d = f64::from(x) - f64::from(y);
        d * d
      })
      .sum();
    assert_close(dist_sqeuclidean_f32(&a, &b).unwrap(), want, want.abs());
  }
}

#[test]
fn manhattan_matches_f64_reference() {
  for len in LENGTHS {
    let a = gen_f32(len, 3);
    let b = gen_f32(len, 4);
    let want: f64 = a.iter().zip(&b).map(|(&x, &y)| (f64::from(x) - f64::from(y)).abs()).sum();
    assert_close(dist_manhattan_f32(&a, &b).unwrap(), want, want.abs());
  }
}

#[test]
fn dot_matches_f64_reference() {
  for len in LENGTHS {
    let a = gen_f32(len, 5);
    let b = gen_f32(len, 6);
    let want: f64 = a.iter().zip(&b).map(|(&x, &y)| f64::from(x) * f64::from(y)).sum();
    let scale: f64 = a.iter().zip(&b).map(|(&x, &y)| (f64::from(x) * f64::from(y)).abs()).sum();
    assert_close(sim_dot_f32(&a, &b).unwrap(), want, scale);
  }
}

#[test]
fn cosine_matches_f64_reference() {
  for len in LENGTHS {
    let a = gen_f32(len, 7);
    let b = gen_f32(len, 8);
    let dot: f64 = a.iter().zip(&b).map(|(&x, &y)| f64::from(x) * f64::from(y)).sum();
    let na: f64 = a.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    let nb: f64 = b.iter().map(|&y| f64::from(y) * f64::from(y)).sum();
    let want = (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0);
    let got = sim_cosine_f32(&a, &b).unwrap();
    assert!((f64::from(got) - want).abs() <= 1e-4, "got {got}, want {want}");
    assert!((-1.0..=1.0).contains(&got));
  }
}

#[test]
fn hamming_matches_bit_reference() {
  // Lengths straddling the 8/16/32/64-byte kernel strides.
  for len in [7usize, 8, 9, 15, 16, 17, 31, 32, 33, 63, 64, 65] {
    let a = gen_u8(len, 9);
    let b = gen_u8(len, 10);
    let mut want = 0u64;
    for (&x, &y) in a.iter().zip(&b) {
      for bit in 0..8 {
        if (x >> bit) & 1 != (y >> bit) & 1 {
          want += 1;
        }
      }
    }
    assert_eq!(dist_hamming_u8(&a, &b).unwrap(), want, "len {len}");
  }
}

#[test]
fn jaccard_matches_f64_reference() {
  for len in LENGTHS {
    let a: Vec<u16> = gen_u8(len, 11).into_iter().map(|x| u16::from(x) * 3).collect();
    let b: Vec<u16> = gen_u8(len, 12).into_iter().map(|x| u16::from(x) * 5).collect();
    let dot: f64 = a.iter().zip(&b).map(|(&x, &y)| f64::from(x) * f64::from(y)).sum();
    let na: f64 = a.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    let nb: f64 = b.iter().map(|&y| f64::from(y) * f64::from(y)).sum();
    let want = (dot / (na + nb - dot)).clamp(0.0, 1.0);
    let got = sim_jaccard_u16(&a, &b).unwrap();
    assert!((f64::from(got) - want).abs() <= 1e-6, "got {got}, want {want}");
  }
}

#[test]
fn zero_length_identities() {
  assert_eq!(dist_sqeuclidean_f32(&[], &[]), Ok(0.0));
  assert_eq!(dist_manhattan_f32(&[], &[]), Ok(0.0));
  assert_eq!(dist_hamming_u8(&[], &[]), Ok(0));
  assert_eq!(sim_dot_f32(&[], &[]), Ok(0.0));
  assert_eq!(sim_cosine_f32(&[], &[]), Ok(1.0));
  assert_eq!(sim_jaccard_u16(&[], &[]), Ok(1.0));
  assert_eq!(normalize_l2_f32(&mut []), Ok(()));
}

#[test]
fn non_finite_positions_all_rejected() {
  for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
    for pos in [0usize, 50, 99] {
      let mut a = gen_f32(100, 13);
      let b = gen_f32(100, 14);
      a[pos] = bad;
      assert!(dist_sqeuclidean_f32(&a, &b).is_err());
      assert!(dist_manhattan_f32(&a, &b).is_err());
      assert!(sim_dot_f32(&a, &b).is_err());
      assert!(sim_cosine_f32(&a, &b).is_err());
      assert!(normalize_l2_f32(&mut a).is_err());
    }
  }
}

#[test]
fn normalize_reference_direction_preserved() {
  let v = gen_f32(257, 15);
  let mut n = v.clone();
  normalize_l2_f32(&mut n).unwrap();

  let norm: f64 = n.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt();
  assert!((norm - 1.0).abs() < 1e-5);

  // Direction unchanged: n is v scaled by the reciprocal of its norm.
  let norm_v: f64 = v.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt();
  for (&x, &y) in v.iter().zip(&n) {
    assert!((f64::from(y) - f64::from(x) / norm_v).abs() < 1e-6);
  }
}
