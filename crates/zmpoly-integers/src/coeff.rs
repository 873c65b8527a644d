//! Polynomial coefficients with an inline small-integer representation.
//!
//! A [`Coeff`] stores values in the `i64` range inline and only allocates an
//! [`Integer`] when a value leaves that range. The representation is kept
//! normalized: `Big` never holds a value that fits in an `i64`, so derived
//! equality and hashing agree with numeric equality.

use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::integer::Integer;

/// An integer coefficient: inline machine word or heap-allocated big integer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Coeff {
    /// A value in the `i64` range.
    Small(i64),
    /// A value outside the `i64` range.
    Big(Integer),
}

impl Coeff {
    /// Normalizes an [`Integer`] into a coefficient.
    #[must_use]
    pub fn from_integer(value: Integer) -> Self {
        match value.to_i64() {
            Some(v) => Coeff::Small(v),
            None => Coeff::Big(value),
        }
    }

    /// Normalizes an `i128` into a coefficient.
    #[must_use]
    pub fn from_i128(value: i128) -> Self {
        match i64::try_from(value) {
            Ok(v) => Coeff::Small(v),
            Err(_) => Coeff::Big(Integer::from(value)),
        }
    }

    /// Returns the value as an [`Integer`].
    #[must_use]
    pub fn to_integer(&self) -> Integer {
        match self {
            Coeff::Small(v) => Integer::new(*v),
            Coeff::Big(b) => b.clone(),
        }
    }

    /// Returns the inline value if this coefficient is small.
    #[must_use]
    pub fn as_small(&self) -> Option<i64> {
        match self {
            Coeff::Small(v) => Some(*v),
            Coeff::Big(_) => None,
        }
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        match self {
            Coeff::Small(v) => v.signum() as i8,
            Coeff::Big(b) => b.signum(),
        }
    }

    /// Returns the number of bits of the magnitude.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        match self {
            Coeff::Small(v) => (u64::BITS - v.unsigned_abs().leading_zeros()) as usize,
            Coeff::Big(b) => b.bit_len(),
        }
    }

    /// Divides exactly.
    ///
    /// Returns `None` if `rhs` is zero or does not divide `self`.
    #[must_use]
    pub fn div_exact(&self, rhs: &Self) -> Option<Self> {
        if let (Coeff::Small(a), Coeff::Small(b)) = (self, rhs) {
            if *b == 0 {
                return None;
            }
            // i64::MIN / -1 is the only overflowing case
            if let (Some(q), Some(r)) = (a.checked_div(*b), a.checked_rem(*b)) {
                return (r == 0).then_some(Coeff::Small(q));
            }
        }
        self.to_integer()
            .div_exact(&rhs.to_integer())
            .map(Coeff::from_integer)
    }

    /// Returns true if `rhs` divides `self` exactly.
    #[must_use]
    pub fn is_divisible_by(&self, rhs: &Self) -> bool {
        self.div_exact(rhs).is_some()
    }
}

impl Default for Coeff {
    fn default() -> Self {
        Coeff::Small(0)
    }
}

impl Zero for Coeff {
    fn zero() -> Self {
        Coeff::Small(0)
    }

    fn is_zero(&self) -> bool {
        matches!(self, Coeff::Small(0))
    }
}

impl One for Coeff {
    fn one() -> Self {
        Coeff::Small(1)
    }

    fn is_one(&self) -> bool {
        matches!(self, Coeff::Small(1))
    }
}

impl PartialOrd for Coeff {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coeff {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Coeff::Small(a), Coeff::Small(b)) => a.cmp(b),
            _ => self.to_integer().cmp(&other.to_integer()),
        }
    }
}

impl fmt::Debug for Coeff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coeff::Small(v) => write!(f, "Small({v})"),
            Coeff::Big(b) => write!(f, "Big({b})"),
        }
    }
}

impl fmt::Display for Coeff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coeff::Small(v) => write!(f, "{v}"),
            Coeff::Big(b) => write!(f, "{b}"),
        }
    }
}

impl Add for &Coeff {
    type Output = Coeff;

    fn add(self, rhs: Self) -> Coeff {
        if let (Coeff::Small(a), Coeff::Small(b)) = (self, rhs) {
            return Coeff::from_i128(i128::from(*a) + i128::from(*b));
        }
        Coeff::from_integer(&self.to_integer() + &rhs.to_integer())
    }
}

impl Add for Coeff {
    type Output = Coeff;

    fn add(self, rhs: Self) -> Coeff {
        &self + &rhs
    }
}

impl Sub for &Coeff {
    type Output = Coeff;

    fn sub(self, rhs: Self) -> Coeff {
        if let (Coeff::Small(a), Coeff::Small(b)) = (self, rhs) {
            return Coeff::from_i128(i128::from(*a) - i128::from(*b));
        }
        Coeff::from_integer(&self.to_integer() - &rhs.to_integer())
    }
}

impl Sub for Coeff {
    type Output = Coeff;

    fn sub(self, rhs: Self) -> Coeff {
        &self - &rhs
    }
}

impl Mul for &Coeff {
    type Output = Coeff;

    fn mul(self, rhs: Self) -> Coeff {
        if let (Coeff::Small(a), Coeff::Small(b)) = (self, rhs) {
            return Coeff::from_i128(i128::from(*a) * i128::from(*b));
        }
        Coeff::from_integer(&self.to_integer() * &rhs.to_integer())
    }
}

impl Mul for Coeff {
    type Output = Coeff;

    fn mul(self, rhs: Self) -> Coeff {
        &self * &rhs
    }
}

impl Neg for &Coeff {
    type Output = Coeff;

    fn neg(self) -> Coeff {
        match self {
            Coeff::Small(v) => Coeff::from_i128(-i128::from(*v)),
            Coeff::Big(b) => Coeff::from_integer(-b),
        }
    }
}

impl Neg for Coeff {
    type Output = Coeff;

    fn neg(self) -> Coeff {
        -&self
    }
}

impl From<i64> for Coeff {
    fn from(value: i64) -> Self {
        Coeff::Small(value)
    }
}

impl From<i32> for Coeff {
    fn from(value: i32) -> Self {
        Coeff::Small(i64::from(value))
    }
}

impl From<Integer> for Coeff {
    fn from(value: Integer) -> Self {
        Coeff::from_integer(value)
    }
}

impl From<&Coeff> for Integer {
    fn from(value: &Coeff) -> Self {
        value.to_integer()
    }
}
