//! Karatsuba multiplication of dense coefficient vectors.
//!
//! Vectors are in ascending degree order: `a[k]` is the coefficient of
//! `x^k`. The divide-and-conquer step needs `O(n^1.58)` coefficient
//! multiplications.

use num_traits::Zero;
use zmpoly_integers::Coeff;

/// Below this length, schoolbook multiplication is faster.
pub const KARATSUBA_THRESHOLD: usize = 32;

/// Multiplies two dense coefficient vectors.
///
/// The result has length `a.len() + b.len() - 1` (empty if either input is
/// empty).
#[must_use]
pub fn karatsuba_mul(a: &[Coeff], b: &[Coeff]) -> Vec<Coeff> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Coeff::zero(); a.len() + b.len() - 1];
    karatsuba_into(&mut out, a, b);
    out
}

/// Adds `a * b` into `out`, which must hold `a.len() + b.len() - 1` entries.
fn karatsuba_into(out: &mut [Coeff], a: &[Coeff], b: &[Coeff]) {
    let (n, m) = (a.len(), b.len());
    if n < KARATSUBA_THRESHOLD || m < KARATSUBA_THRESHOLD {
        schoolbook_into(out, a, b);
        return;
    }

    // unbalanced operands: multiply the longer one in slices
    if n > 2 * m || m > 2 * n {
        let (long, short) = if n >= m { (a, b) } else { (b, a) };
        for (k, piece) in long.chunks(short.len()).enumerate() {
            let offset = k * short.len();
            karatsuba_into(&mut out[offset..offset + piece.len() + short.len() - 1], piece, short);
        }
        return;
    }

    let half = n.max(m).div_ceil(2);
    let (a0, a1) = a.split_at(half.min(n));
    let (b0, b1) = b.split_at(half.min(m));

    let z0 = karatsuba_mul(a0, b0);
    let z2 = karatsuba_mul(a1, b1);

    let a01 = add_slices(a0, a1);
    let b01 = add_slices(b0, b1);
    let mut z1 = karatsuba_mul(&a01, &b01);
    for (i, c) in z0.iter().enumerate() {
        z1[i] = &z1[i] - c;
    }
    for (i, c) in z2.iter().enumerate() {
        z1[i] = &z1[i] - c;
    }

    // out += z0 + z1 x^half + z2 x^(2 half)
    for (i, c) in z0.into_iter().enumerate() {
        out[i] = &out[i] + &c;
    }
    // z1 is one entry longer than its true degree span when `a1` or `b1`
    // is short; that top entry is zero and lies past the end of `out`
    let room = z1.len().min(out.len() - half);
    debug_assert!(z1[room..].iter().all(Zero::is_zero));
    for (i, c) in z1.into_iter().take(room).enumerate() {
        out[i + half] = &out[i + half] + &c;
    }
    for (i, c) in z2.into_iter().enumerate() {
        out[i + 2 * half] = &out[i + 2 * half] + &c;
    }
}

fn add_slices(x: &[Coeff], y: &[Coeff]) -> Vec<Coeff> {
    let len = x.len().max(y.len());
    (0..len)
        .map(|i| match (x.get(i), y.get(i)) {
            (Some(p), Some(q)) => p + q,
            (Some(p), None) | (None, Some(p)) => p.clone(),
            (None, None) => Coeff::zero(),
        })
        .collect()
}

/// Schoolbook multiplication: `O(n m)`.
#[must_use]
pub fn schoolbook_mul(a: &[Coeff], b: &[Coeff]) -> Vec<Coeff> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Coeff::zero(); a.len() + b.len() - 1];
    schoolbook_into(&mut out, a, b);
    out
}

fn schoolbook_into(out: &mut [Coeff], a: &[Coeff], b: &[Coeff]) {
    for (i, x) in a.iter().enumerate() {
        if x.is_zero() {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            out[i + j] = &out[i + j] + &(x * y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs(values: impl IntoIterator<Item = i64>) -> Vec<Coeff> {
        values.into_iter().map(Coeff::from).collect()
    }

    #[test]
    fn test_schoolbook() {
        // (1 + 2x)(3 + 4x) = 3 + 10x + 8x^2
        let c = schoolbook_mul(&coeffs([1, 2]), &coeffs([3, 4]));
        assert_eq!(c, coeffs([3, 10, 8]));
    }

    #[test]
    fn test_karatsuba_small() {
        let c = karatsuba_mul(&coeffs([1, 2]), &coeffs([3, 4]));
        assert_eq!(c, coeffs([3, 10, 8]));
        assert!(karatsuba_mul(&[], &coeffs([1])).is_empty());
    }

    #[test]
    fn test_karatsuba_large() {
        let n = 100;
        let a = coeffs(0..n);
        let b = coeffs((0..n).map(|i| n - i));

        assert_eq!(karatsuba_mul(&a, &b), schoolbook_mul(&a, &b));
    }

    #[test]
    fn test_karatsuba_unbalanced_and_odd() {
        let a = coeffs((0..257).map(|i| (i * 7919) % 101 - 50));
        let b = coeffs((0..45).map(|i| (i * 31) % 17 - 8));

        assert_eq!(karatsuba_mul(&a, &b), schoolbook_mul(&a, &b));
        assert_eq!(karatsuba_mul(&b, &a), schoolbook_mul(&a, &b));
    }

    #[test]
    fn test_karatsuba_uneven_split() {
        // the upper half of the shorter operand is empty or one short
        for (n, m) in [(40, 79), (33, 65), (64, 127), (79, 40)] {
            let a = coeffs((0..n).map(|i| (i * 13) % 29 - 14));
            let b = coeffs((0..m).map(|i| (i * 17) % 23 - 11));
            assert_eq!(karatsuba_mul(&a, &b), schoolbook_mul(&a, &b), "{n} x {m}");
        }
    }

    #[test]
    fn test_karatsuba_big_coefficients() {
        let big = &Coeff::from(i64::MAX) * &Coeff::from(i64::MAX);
        let a: Vec<Coeff> = (0..40).map(|i| &big + &Coeff::from(i)).collect();
        let b: Vec<Coeff> = (0..40).map(|i| &big - &Coeff::from(i)).collect();

        assert_eq!(karatsuba_mul(&a, &b), schoolbook_mul(&a, &b));
    }
}
