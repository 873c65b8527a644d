//! Product-sum accumulators for polynomial coefficient arithmetic.
//!
//! Heap-based multiplication and division compute every output coefficient
//! as a sum of many pairwise coefficient products. When every operand
//! coefficient fits in a machine word, [`WideAccumulator`] keeps the running
//! sum in three words and never allocates. [`BigAccumulator`] handles the
//! general case and still routes small-by-small products through a wide
//! accumulator.
//!
//! Which accumulator an operation uses is decided once, by a pre-scan of the
//! operands, not per term.

use num_traits::Zero;

use crate::coeff::Coeff;
use crate::integer::Integer;

/// A running sum of coefficient products.
pub trait Accumulator: Default {
    /// Operand coefficient type consumed by this accumulator.
    type Coeff: Clone + Send + Sync;

    /// Converts a general coefficient into an operand, if representable.
    fn lift(c: &Coeff) -> Option<Self::Coeff>;

    /// Adds `a`.
    fn add(&mut self, a: &Self::Coeff);

    /// Adds `a * b`.
    fn add_product(&mut self, a: &Self::Coeff, b: &Self::Coeff);

    /// Subtracts `a * b`.
    fn sub_product(&mut self, a: &Self::Coeff, b: &Self::Coeff);

    /// Returns the running sum and resets it to zero.
    fn take(&mut self) -> Coeff;
}

/// A 192-bit two's complement accumulator for `i64` products.
///
/// The product of two `i64` needs up to 127 bits plus sign, so each partial
/// product is sign-extended to three words before being added with carry.
/// Up to 2^64 products can be summed without overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WideAccumulator {
    lo: u128,
    hi: u64,
}

impl WideAccumulator {
    /// Creates a zero accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { lo: 0, hi: 0 }
    }

    #[inline]
    fn add_i128(&mut self, p: i128) {
        let ext = if p < 0 { u64::MAX } else { 0 };
        let (lo, carry) = self.lo.overflowing_add(p as u128);
        self.lo = lo;
        self.hi = self.hi.wrapping_add(ext).wrapping_add(u64::from(carry));
    }

    #[inline]
    fn sub_i128(&mut self, p: i128) {
        let ext = if p < 0 { u64::MAX } else { 0 };
        let (lo, borrow) = self.lo.overflowing_sub(p as u128);
        self.lo = lo;
        self.hi = self.hi.wrapping_sub(ext).wrapping_sub(u64::from(borrow));
    }

    /// Adds a single word.
    #[inline]
    pub fn add_word(&mut self, a: i64) {
        self.add_i128(i128::from(a));
    }

    /// Adds the product `a * b`.
    #[inline]
    pub fn add_mul(&mut self, a: i64, b: i64) {
        self.add_i128(i128::from(a) * i128::from(b));
    }

    /// Subtracts the product `a * b`.
    #[inline]
    pub fn sub_mul(&mut self, a: i64, b: i64) {
        self.sub_i128(i128::from(a) * i128::from(b));
    }

    /// Returns the sum as a normalized coefficient.
    #[must_use]
    pub fn to_coeff(&self) -> Coeff {
        let lo = self.lo as i128;
        let sign_word = if lo < 0 { u64::MAX } else { 0 };
        if self.hi == sign_word {
            Coeff::from_i128(lo)
        } else {
            Coeff::Big(Integer::from_words(self.hi as i64, self.lo))
        }
    }

    /// Returns the sum as an [`Integer`].
    #[must_use]
    pub fn to_integer(&self) -> Integer {
        self.to_coeff().to_integer()
    }

    /// Resets to zero.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Accumulator for WideAccumulator {
    type Coeff = i64;

    fn lift(c: &Coeff) -> Option<i64> {
        c.as_small()
    }

    #[inline]
    fn add(&mut self, a: &i64) {
        self.add_word(*a);
    }

    #[inline]
    fn add_product(&mut self, a: &i64, b: &i64) {
        self.add_mul(*a, *b);
    }

    #[inline]
    fn sub_product(&mut self, a: &i64, b: &i64) {
        self.sub_mul(*a, *b);
    }

    fn take(&mut self) -> Coeff {
        let value = self.to_coeff();
        self.clear();
        value
    }
}

/// An accumulator over arbitrary coefficients.
///
/// Products of two small coefficients go through an inner
/// [`WideAccumulator`]; anything involving a big coefficient falls through to
/// arbitrary precision.
#[derive(Clone, Debug, Default)]
pub struct BigAccumulator {
    small: WideAccumulator,
    big: Integer,
}

impl BigAccumulator {
    fn add_integer(&mut self, value: Integer) {
        let sum = std::mem::take(&mut self.big) + value;
        self.big = sum;
    }
}

impl Accumulator for BigAccumulator {
    type Coeff = Coeff;

    fn lift(c: &Coeff) -> Option<Coeff> {
        Some(c.clone())
    }

    fn add(&mut self, a: &Coeff) {
        match a {
            Coeff::Small(v) => self.small.add_word(*v),
            Coeff::Big(b) => self.add_integer(b.clone()),
        }
    }

    fn add_product(&mut self, a: &Coeff, b: &Coeff) {
        match (a, b) {
            (Coeff::Small(x), Coeff::Small(y)) => self.small.add_mul(*x, *y),
            _ => self.add_integer(&a.to_integer() * &b.to_integer()),
        }
    }

    fn sub_product(&mut self, a: &Coeff, b: &Coeff) {
        match (a, b) {
            (Coeff::Small(x), Coeff::Small(y)) => self.small.sub_mul(*x, *y),
            _ => self.add_integer(-(&a.to_integer() * &b.to_integer())),
        }
    }

    fn take(&mut self) -> Coeff {
        let value = if self.big.is_zero() {
            self.small.to_coeff()
        } else {
            Coeff::from_integer(self.small.to_integer() + std::mem::take(&mut self.big))
        };
        self.small.clear();
        self.big = Integer::zero();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_simple_sum() {
        let mut acc = WideAccumulator::new();
        acc.add_mul(3, 4);
        acc.sub_mul(2, 5);
        acc.add_word(-2);
        assert_eq!(acc, WideAccumulator::new());

        acc.add_mul(-7, 6);
        assert_eq!(acc.to_coeff(), Coeff::from(-42));
    }

    #[test]
    fn test_wide_sign_extension() {
        // (-2^63) * (2^63 - 1) is negative and needs the full 128 bits
        let mut acc = WideAccumulator::new();
        acc.add_mul(i64::MIN, i64::MAX);
        let expected = &Coeff::from(i64::MIN) * &Coeff::from(i64::MAX);
        assert_eq!(acc.to_coeff(), expected);

        acc.sub_mul(i64::MIN, i64::MAX);
        assert_eq!(acc, WideAccumulator::new());
    }

    #[test]
    fn test_wide_carries_into_third_word() {
        let mut acc = WideAccumulator::new();
        let mut expected = Integer::new(0);
        for _ in 0..8 {
            acc.add_mul(i64::MIN, i64::MIN);
            expected = expected + Integer::new(i64::MIN) * Integer::new(i64::MIN);
        }
        assert_eq!(acc.to_integer(), expected);

        for _ in 0..8 {
            acc.sub_mul(i64::MIN, i64::MIN);
        }
        assert!(acc.to_coeff().is_zero());
    }

    #[test]
    fn test_wide_take_resets() {
        let mut acc = WideAccumulator::new();
        acc.add_mul(5, 5);
        assert_eq!(Accumulator::take(&mut acc), Coeff::from(25));
        assert_eq!(acc, WideAccumulator::new());
    }

    #[test]
    fn test_big_mixes_paths() {
        let big = &Coeff::from(i64::MAX) * &Coeff::from(4);
        let mut acc = BigAccumulator::default();
        acc.add_product(&big, &Coeff::from(2));
        acc.add_product(&Coeff::from(3), &Coeff::from(3));
        acc.sub_product(&Coeff::from(i64::MAX), &Coeff::from(8));
        assert_eq!(acc.take(), Coeff::from(9));
        assert!(acc.take().is_zero());
    }

    #[test]
    fn test_big_cancellation_across_paths() {
        let big = &Coeff::from(i64::MAX) * &Coeff::from(2);
        let mut acc = BigAccumulator::default();
        acc.add(&big);
        acc.sub_product(&Coeff::from(i64::MAX), &Coeff::from(2));
        assert_eq!(acc.take(), Coeff::Small(0));
    }
}
