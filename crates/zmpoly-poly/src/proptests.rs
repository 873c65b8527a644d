//! Property-based tests for polynomial multiplication and division.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use zmpoly_integers::Coeff;

    use crate::{Engine, EngineConfig, MonomialOrder, MulStrategy, PolyContext, Polynomial, WorkerPool};

    fn order() -> impl Strategy<Value = MonomialOrder> {
        prop_oneof![
            Just(MonomialOrder::Lex),
            Just(MonomialOrder::Grlex),
            Just(MonomialOrder::Grevlex),
        ]
    }

    fn context() -> impl Strategy<Value = PolyContext> {
        (1usize..=3, order()).prop_map(|(nvars, order)| PolyContext::new(nvars, order))
    }

    // Mostly small coefficients, occasionally past the machine word
    fn coeff() -> impl Strategy<Value = Coeff> {
        prop_oneof![
            4 => (-50i64..50).prop_map(Coeff::from),
            1 => any::<i64>().prop_map(|c| &Coeff::from(c) * &Coeff::from(3)),
        ]
    }

    fn poly_in(ctx: PolyContext, max_exp: u64, max_terms: usize) -> impl Strategy<Value = Polynomial> {
        let exps = proptest::collection::vec(0..=max_exp, ctx.nvars());
        proptest::collection::vec((coeff(), exps), 0..=max_terms)
            .prop_map(move |terms| Polynomial::from_terms(ctx, terms).unwrap())
    }

    fn nonzero_in(ctx: PolyContext, max_exp: u64, max_terms: usize) -> impl Strategy<Value = Polynomial> {
        poly_in(ctx, max_exp, max_terms).prop_filter("polynomial must be non-zero", |p| !p.is_zero())
    }

    fn pair() -> impl Strategy<Value = (Polynomial, Polynomial)> {
        context().prop_flat_map(|ctx| (poly_in(ctx, 6, 8), poly_in(ctx, 6, 8)))
    }

    fn triple() -> impl Strategy<Value = (Polynomial, Polynomial, Polynomial)> {
        context().prop_flat_map(|ctx| (poly_in(ctx, 4, 5), poly_in(ctx, 4, 5), poly_in(ctx, 4, 5)))
    }

    fn heap() -> Engine<'static> {
        Engine::with_config(EngineConfig::heap_only())
    }

    proptest! {
        // Ring axioms

        #[test]
        fn mul_commutative((a, b) in pair()) {
            let engine = Engine::new();
            prop_assert_eq!(engine.mul(&a, &b).unwrap(), engine.mul(&b, &a).unwrap());
        }

        #[test]
        fn mul_associative((a, b, c) in triple()) {
            let engine = Engine::new();
            let left = engine.mul(&engine.mul(&a, &b).unwrap(), &c).unwrap();
            let right = engine.mul(&a, &engine.mul(&b, &c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn mul_distributes_over_add((a, b, c) in triple()) {
            let engine = Engine::new();
            let left = engine.mul(&a, &b.add(&c).unwrap()).unwrap();
            let right = engine.mul(&a, &b).unwrap().add(&engine.mul(&a, &c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn mul_identity_and_zero((a, _) in pair()) {
            let engine = Engine::new();
            let ctx = a.context();
            prop_assert_eq!(engine.mul(&a, &Polynomial::one(ctx)).unwrap(), a.clone());
            prop_assert!(engine.mul(&Polynomial::zero(ctx), &a).unwrap().is_zero());
        }

        #[test]
        fn product_is_canonical((a, b) in pair()) {
            let product = Engine::new().mul(&a, &b).unwrap();
            prop_assert!(product.is_canonical());
            prop_assert!(product.len() <= a.len() * b.len());
        }

        // Method agreement

        #[test]
        fn methods_agree((a, b) in pair()) {
            let heap_product = heap().mul(&a, &b).unwrap();

            let default_product = Engine::new().mul(&a, &b).unwrap();
            prop_assert_eq!(&default_product, &heap_product);

            let eager_array = Engine::with_config(EngineConfig {
                allow_dense: false,
                array_ratio: usize::MAX,
                ..EngineConfig::default()
            });
            prop_assert_eq!(&eager_array.mul(&a, &b).unwrap(), &heap_product);

            let pool = WorkerPool::new(2).unwrap();
            let threaded = Engine::with_config(EngineConfig {
                thread_grain: 1,
                ..EngineConfig::heap_only()
            })
            .with_pool(&pool);
            prop_assert_eq!(&threaded.mul(&a, &b).unwrap(), &heap_product);
        }

        #[test]
        fn dense_matches_heap(
            a in nonzero_in(PolyContext::new(1, MonomialOrder::Lex), 60, 12),
            b in nonzero_in(PolyContext::new(1, MonomialOrder::Lex), 60, 12),
        ) {
            let eager_dense = Engine::with_config(EngineConfig {
                dense_ratio: usize::MAX,
                ..EngineConfig::default()
            });
            let (product, strategy) = eager_dense.mul_with_strategy(&a, &b).unwrap();
            if a.len() > 1 && b.len() > 1 {
                prop_assert_eq!(strategy, MulStrategy::Dense);
            }
            prop_assert_eq!(product, heap().mul(&a, &b).unwrap());
        }

        // Division

        #[test]
        fn divides_recovers_factor(
            (a, b) in context().prop_flat_map(|ctx| (poly_in(ctx, 5, 6), nonzero_in(ctx, 5, 6)))
        ) {
            let engine = Engine::new();
            let product = engine.mul(&a, &b).unwrap();
            prop_assert_eq!(engine.divides(&product, &b).unwrap(), Some(a));
        }

        #[test]
        fn divides_rejects_perturbed_product(
            (a, b) in context().prop_flat_map(|ctx| (nonzero_in(ctx, 4, 5), nonzero_in(ctx, 4, 5)))
        ) {
            prop_assume!(b.total_degree() > 0);
            let engine = Engine::new();
            // adding one leaves a remainder of 1 modulo any non-constant b
            let perturbed = engine.mul(&a, &b).unwrap().add(&Polynomial::one(a.context())).unwrap();
            prop_assert_eq!(engine.divides(&perturbed, &b).unwrap(), None);
        }

        #[test]
        fn divides_into_matches_divides(
            (a, b) in context().prop_flat_map(|ctx| (poly_in(ctx, 4, 6), nonzero_in(ctx, 3, 3)))
        ) {
            let engine = Engine::new();
            let mut q = Polynomial::var(a.context(), 0);
            let exact = engine.divides_into(&mut q, &a, &b).unwrap();
            match engine.divides(&a, &b).unwrap() {
                Some(expected) => {
                    prop_assert!(exact);
                    prop_assert_eq!(q, expected);
                }
                None => {
                    prop_assert!(!exact);
                    prop_assert!(q.is_zero());
                }
            }
        }

        #[test]
        fn threaded_divides_matches_single(
            (a, b, c) in context().prop_flat_map(|ctx| (poly_in(ctx, 4, 6), nonzero_in(ctx, 4, 6), poly_in(ctx, 5, 8)))
        ) {
            let single = Engine::new();
            let pool = WorkerPool::new(2).unwrap();
            let threaded = Engine::with_config(EngineConfig {
                thread_grain: 1,
                ..EngineConfig::default()
            })
            .with_pool(&pool);

            let product = single.mul(&a, &b).unwrap();
            prop_assert_eq!(threaded.divides(&product, &b).unwrap(), Some(a));
            prop_assert_eq!(threaded.divides(&c, &b).unwrap(), single.divides(&c, &b).unwrap());
            prop_assert_eq!(pool.available(), 2);
        }

        // Representation

        #[test]
        fn repack_preserves_terms((a, _) in pair(), extra in 0u32..3) {
            let wider = a.repack(16 << extra).unwrap();
            prop_assert_eq!(&wider, &a);
            prop_assert!(wider.is_canonical());
            prop_assert_eq!(wider.repack(a.bits()).unwrap(), a);
        }

        #[test]
        fn mul_assign_matches_mul((a, b) in pair()) {
            let engine = Engine::new();
            let expected = engine.mul(&a, &b).unwrap();

            let mut aliased = a.clone();
            engine.mul_assign(&mut aliased, &b).unwrap();
            prop_assert_eq!(&aliased, &expected);

            let mut out = Polynomial::zero(a.context());
            engine.mul_into(&mut out, &a, &b).unwrap();
            prop_assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_bivariate_square() {
        // (x + y + 1)^2 in grevlex
        let ctx = PolyContext::new(2, MonomialOrder::Grevlex);
        let x = Polynomial::var(ctx, 0);
        let y = Polynomial::var(ctx, 1);
        let p = x.add(&y).unwrap().add(&Polynomial::one(ctx)).unwrap();

        let engine = Engine::new();
        let square = engine.mul(&p, &p).unwrap();
        assert_eq!(square.len(), 6);
        assert_eq!(square.to_string(), "x^2 + 2*x*y + y^2 + 2*x + 2*y + 1");
        assert_eq!(engine.divides(&square, &p).unwrap(), Some(p));
    }

    #[test]
    fn test_word_overflow_in_product() {
        // (2^62 x + 2^62)^2 needs coefficients past the machine word
        let ctx = PolyContext::new(1, MonomialOrder::Lex);
        let big = 1i64 << 62;
        let p = Polynomial::from_terms(ctx, [(big, [1u64]), (big, [0])]).unwrap();

        let square = heap().mul(&p, &p).unwrap();
        let c = &Coeff::from(big) * &Coeff::from(big);
        let expected = Polynomial::from_terms(
            ctx,
            [(c.clone(), [2u64]), (&c + &c, [1]), (c, [0])],
        )
        .unwrap();
        assert_eq!(square, expected);
        assert_eq!(heap().divides(&square, &p).unwrap(), Some(p));
    }

    #[test]
    fn test_many_variable_exponents_widen() {
        let ctx = PolyContext::new(4, MonomialOrder::Lex);
        let p = Polynomial::from_terms(ctx, [(1, [200u64, 1, 0, 3]), (-1, [0, 0, 250, 0])]).unwrap();
        let square = Engine::new().mul(&p, &p).unwrap();

        assert!(square.bits() > p.bits());
        assert_eq!(square.leading_exponents(), Some(vec![400, 2, 0, 6]));
        assert_eq!(square.degrees(), vec![400, 2, 500, 6]);
    }
}
