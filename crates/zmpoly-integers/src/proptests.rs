//! Property-based tests for coefficient arithmetic and accumulators.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Accumulator, BigAccumulator, Coeff, Integer, WideAccumulator};

    // Full-range machine words, biased toward the extremes
    fn word() -> impl Strategy<Value = i64> {
        prop_oneof![
            any::<i64>(),
            Just(i64::MIN),
            Just(i64::MAX),
            -1000i64..1000i64,
        ]
    }

    // Coefficients that may or may not fit inline
    fn coeff() -> impl Strategy<Value = Coeff> {
        prop_oneof![
            word().prop_map(Coeff::from),
            (word(), word()).prop_map(|(a, b)| &Coeff::from(a) * &Coeff::from(b)),
        ]
    }

    fn non_zero_coeff() -> impl Strategy<Value = Coeff> {
        coeff().prop_filter("coefficient must be non-zero", |c| c.signum() != 0)
    }

    proptest! {
        // Coefficient ring axioms against the big-integer reference

        #[test]
        fn coeff_add_matches_integer(a in coeff(), b in coeff()) {
            let sum = &a + &b;
            prop_assert_eq!(sum.to_integer(), &a.to_integer() + &b.to_integer());
        }

        #[test]
        fn coeff_mul_matches_integer(a in coeff(), b in coeff()) {
            let product = &a * &b;
            prop_assert_eq!(product.to_integer(), &a.to_integer() * &b.to_integer());
        }

        #[test]
        fn coeff_is_normalized(a in coeff(), b in coeff()) {
            for c in [&a + &b, &a - &b, &a * &b, -&a] {
                prop_assert_eq!(c.as_small().is_some(), c.to_integer().to_i64().is_some());
            }
        }

        #[test]
        fn coeff_div_exact_inverts_mul(a in coeff(), b in non_zero_coeff()) {
            let product = &a * &b;
            prop_assert_eq!(product.div_exact(&b), Some(a));
        }

        #[test]
        fn coeff_distributive(a in coeff(), b in coeff(), c in coeff()) {
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
        }

        // Accumulators

        #[test]
        fn wide_matches_integer_sum(pairs in proptest::collection::vec((word(), word(), any::<bool>()), 0..64)) {
            let mut acc = WideAccumulator::new();
            let mut expected = Integer::new(0);
            for (a, b, negate) in pairs {
                let p = Integer::new(a) * Integer::new(b);
                if negate {
                    acc.sub_mul(a, b);
                    expected = expected - p;
                } else {
                    acc.add_mul(a, b);
                    expected = expected + p;
                }
            }
            prop_assert_eq!(acc.to_integer(), expected);
        }

        #[test]
        fn big_matches_integer_sum(pairs in proptest::collection::vec((coeff(), coeff()), 0..32)) {
            let mut acc = BigAccumulator::default();
            let mut expected = Integer::new(0);
            for (a, b) in &pairs {
                acc.add_product(a, b);
                expected = expected + &a.to_integer() * &b.to_integer();
            }
            prop_assert_eq!(acc.take(), Coeff::from_integer(expected));
        }
    }
}
