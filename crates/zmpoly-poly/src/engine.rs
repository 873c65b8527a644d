//! Strategy selection for multiplication and exact division.
//!
//! [`Engine`] inspects cheap statistics of its operands (lengths, field
//! maxima, coefficient sizes) and picks a method:
//!
//! 1. a zero or single-term operand is handled directly;
//! 2. univariate products with a small degree span go through dense
//!    Karatsuba;
//! 3. single-word products with word-sized coefficients and a compact
//!    exponent box use chunked arrays;
//! 4. everything else runs the heap method, across worker threads when a
//!    [`WorkerPool`] is attached and grants some.
//!
//! A method that cannot handle its input declines and the next one runs;
//! the heap method always succeeds. Exact division runs a few cheap
//! divisibility checks, then the heap method: on the calling thread, or as a
//! downward and an upward run on two threads whose joined quotient is
//! confirmed by a threaded multiplication.

use std::fmt;

use tracing::debug;
use zmpoly_integers::{Accumulator, BigAccumulator, Coeff, WideAccumulator};

use crate::algorithms::div_heap::{divides_heap, DivOutcome};
use crate::algorithms::div_threaded::divides_heap_split;
use crate::algorithms::mul_array::{mul_array, ArrayLimits};
use crate::algorithms::mul_dense::mul_dense;
use crate::algorithms::mul_heap::{mul_johnson, Operand};
use crate::algorithms::mul_threaded::mul_heap_threaded;
use crate::algorithms::term_ops::{div_by_term, mul_by_term};
use crate::bits::product_bits;
use crate::config::EngineConfig;
use crate::error::PolyError;
use crate::monomial::{monomial_divides, MonomialLayout};
use crate::polynomial::Polynomial;
use crate::pool::{ThreadGrant, WorkerPool};
use crate::terms::TermVec;

/// The method that produced a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulStrategy {
    /// An operand was zero.
    Zero,
    /// An operand had a single term.
    Monomial,
    /// Dense univariate multiplication.
    Dense,
    /// Chunked array multiplication.
    Array,
    /// Heap multiplication on the calling thread.
    Heap,
    /// Heap multiplication split across worker threads.
    ThreadedHeap,
}

impl fmt::Display for MulStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zero => "zero",
            Self::Monomial => "monomial",
            Self::Dense => "dense",
            Self::Array => "array",
            Self::Heap => "heap",
            Self::ThreadedHeap => "threaded heap",
        };
        write!(f, "{name}")
    }
}

/// Multiplication and exact division of [`Polynomial`]s.
///
/// An engine without a pool runs everything on the calling thread.
#[derive(Clone, Debug, Default)]
pub struct Engine<'p> {
    config: EngineConfig,
    pool: Option<&'p WorkerPool>,
}

impl Engine<'static> {
    /// Creates a single-threaded engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a single-threaded engine with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, pool: None }
    }
}

impl<'p> Engine<'p> {
    /// Attaches a worker pool; threads are requested once per operation.
    #[must_use]
    pub fn with_pool<'q>(self, pool: &'q WorkerPool) -> Engine<'q> {
        Engine {
            config: self.config,
            pool: Some(pool),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Multiplies two polynomials.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ContextMismatch`] for operands of different
    /// contexts and [`PolyError::ExponentOverflow`] if the product's
    /// exponents cannot be packed.
    pub fn mul(&self, a: &Polynomial, b: &Polynomial) -> Result<Polynomial, PolyError> {
        self.mul_with_strategy(a, b).map(|(product, _)| product)
    }

    /// Multiplies into `out`, replacing its contents.
    ///
    /// # Errors
    ///
    /// See [`Engine::mul`]; `out` is left unchanged on error.
    pub fn mul_into(&self, out: &mut Polynomial, a: &Polynomial, b: &Polynomial) -> Result<(), PolyError> {
        *out = self.mul(a, b)?;
        Ok(())
    }

    /// Replaces `a` with `a * b`.
    ///
    /// The product is built in a scratch polynomial and swapped in.
    ///
    /// # Errors
    ///
    /// See [`Engine::mul`]; `a` is left unchanged on error.
    pub fn mul_assign(&self, a: &mut Polynomial, b: &Polynomial) -> Result<(), PolyError> {
        let mut scratch = self.mul(a, b)?;
        a.swap(&mut scratch);
        Ok(())
    }

    /// Multiplies and reports which method ran.
    ///
    /// # Errors
    ///
    /// See [`Engine::mul`].
    pub fn mul_with_strategy(
        &self,
        a: &Polynomial,
        b: &Polynomial,
    ) -> Result<(Polynomial, MulStrategy), PolyError> {
        a.check_context(b)?;
        let ctx = a.context();
        if a.is_zero() || b.is_zero() {
            return Ok((Polynomial::zero(ctx), MulStrategy::Zero));
        }

        let bits = product_bits(&a.field_maxima(), &b.field_maxima())?;
        let layout = MonomialLayout::new(ctx, bits)?;
        let a_terms = a.terms_at(&layout);
        let b_terms = b.terms_at(&layout);
        // the shorter operand supplies the heap rows
        let (rows, cols) = if a_terms.len() <= b_terms.len() {
            (&*a_terms, &*b_terms)
        } else {
            (&*b_terms, &*a_terms)
        };

        if rows.len() == 1 {
            let product = mul_by_term(cols, rows.coeff(0), rows.exp(0), &layout);
            return Ok(finish(layout, product, MulStrategy::Monomial, rows, cols, 0));
        }

        if self.config.allow_dense && layout.words() == 1 && ctx.nvars() == 1 {
            let span = a.total_degree() + b.total_degree() + 1;
            let budget = self
                .config
                .dense_ratio
                .saturating_mul(rows.len())
                .saturating_mul(cols.len());
            if usize::try_from(span).is_ok_and(|span| span <= budget) {
                if let Some(product) = mul_dense(rows, cols, &layout, self.config.max_dense_len) {
                    return Ok(finish(layout, product, MulStrategy::Dense, rows, cols, 0));
                }
                debug!(span, "dense method declined");
            }
        }

        let grant = self.request_threads(rows.len());
        let threads = grant.as_ref().map_or(0, ThreadGrant::count);
        let small = small_coeffs(rows).zip(small_coeffs(cols));

        if let Some((row_coeffs, col_coeffs)) = &small {
            let b = Operand::new(row_coeffs, rows.exps(), layout.words());
            let c = Operand::new(col_coeffs, cols.exps(), layout.words());

            if self.config.allow_array && layout.words() == 1 {
                let limits = ArrayLimits {
                    max_array_size: self.config.max_array_size,
                    array_ratio: if threads > 0 {
                        self.config.array_ratio_threaded
                    } else {
                        self.config.array_ratio
                    },
                };
                if let Some(product) = mul_array(&b, &c, &layout, limits, grant.as_ref()) {
                    return Ok(finish(layout, product, MulStrategy::Array, rows, cols, threads));
                }
                debug!(bits, "array method declined");
            }

            let (product, strategy) = self.heap::<WideAccumulator>(&b, &c, &layout, grant.as_ref());
            return Ok(finish(layout, product, strategy, rows, cols, threads));
        }

        let b = Operand::new(rows.coeffs(), rows.exps(), layout.words());
        let c = Operand::new(cols.coeffs(), cols.exps(), layout.words());
        let (product, strategy) = self.heap::<BigAccumulator>(&b, &c, &layout, grant.as_ref());
        Ok(finish(layout, product, strategy, rows, cols, threads))
    }

    fn request_threads(&self, shorter: usize) -> Option<ThreadGrant<'p>> {
        let wanted = self.config.threads_for(shorter);
        match self.pool {
            Some(pool) if wanted > 0 => Some(pool.request(wanted)),
            _ => None,
        }
    }

    fn heap<A: Accumulator>(
        &self,
        b: &Operand<'_, A::Coeff>,
        c: &Operand<'_, A::Coeff>,
        layout: &MonomialLayout,
        grant: Option<&ThreadGrant<'_>>,
    ) -> (TermVec, MulStrategy) {
        match grant {
            Some(grant) if grant.count() > 0 => (
                mul_heap_threaded::<A>(
                    b,
                    c,
                    layout,
                    grant,
                    self.config.divisions_per_thread,
                    self.config.division_skew,
                ),
                MulStrategy::ThreadedHeap,
            ),
            _ => (mul_johnson::<A>(b, c, layout), MulStrategy::Heap),
        }
    }

    /// Divides `a` by `b` exactly.
    ///
    /// Returns `Ok(None)` when `b` does not divide `a`; a zero dividend
    /// yields `Ok(Some(0))`. With a pool attached, workers are requested
    /// once for the call.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::DivisionByZero`] for a zero divisor and
    /// [`PolyError::ContextMismatch`] for operands of different contexts.
    pub fn divides(&self, a: &Polynomial, b: &Polynomial) -> Result<Option<Polynomial>, PolyError> {
        a.check_context(b)?;
        if b.is_zero() {
            return Err(PolyError::DivisionByZero);
        }
        if a.is_zero() {
            return Ok(Some(Polynomial::zero(a.context())));
        }

        let bits = a.bits().max(b.bits());
        let layout = MonomialLayout::new(a.context(), bits)?;
        let a_terms = a.terms_at(&layout);
        let b_terms = b.terms_at(&layout);

        if let Some(reason) = precheck(a, b, &a_terms, &b_terms, &layout) {
            debug!(reason, len_a = a.len(), len_b = b.len(), "division is not exact");
            return Ok(None);
        }

        let quotient = if b_terms.len() == 1 {
            div_by_term(&a_terms, b_terms.coeff(0), b_terms.exp(0), &layout)
        } else {
            match self.request_threads(a_terms.len().min(b_terms.len())) {
                Some(grant) if grant.count() > 0 => self.divide_split(&a_terms, &b_terms, &layout, &grant),
                _ => divide_heap(&a_terms, &b_terms, &layout),
            }
        };

        match quotient {
            Some(q) => {
                debug!(len_a = a.len(), len_b = b.len(), len_q = q.len(), bits, "exact division");
                Ok(Some(Polynomial::from_raw(layout, q)))
            }
            None => {
                debug!(len_a = a.len(), len_b = b.len(), "division is not exact");
                Ok(None)
            }
        }
    }

    /// Runs the two-thread division and confirms its candidate quotient.
    fn divide_split(
        &self,
        a: &TermVec,
        b: &TermVec,
        layout: &MonomialLayout,
        grant: &ThreadGrant<'_>,
    ) -> Option<TermVec> {
        let words = layout.words();
        let (lead, trail) = (b.coeff(0), b.coeff(b.len() - 1));

        let mut outcome = DivOutcome::NeedsBig;
        if let Some((a_small, b_small)) = small_coeffs(a).zip(small_coeffs(b)) {
            outcome = divides_heap_split::<WideAccumulator>(
                &Operand::new(&a_small, a.exps(), words),
                &Operand::new(&b_small, b.exps(), words),
                lead,
                trail,
                layout,
                grant,
            );
            if matches!(outcome, DivOutcome::NeedsBig) {
                debug!("quotient left the word range, restarting with big coefficients");
            }
        }
        if matches!(outcome, DivOutcome::NeedsBig) {
            outcome = divides_heap_split::<BigAccumulator>(
                &Operand::new(a.coeffs(), a.exps(), words),
                &Operand::new(b.coeffs(), b.exps(), words),
                lead,
                trail,
                layout,
                grant,
            );
        }
        let DivOutcome::Complete(quotient) = outcome else {
            return None;
        };
        if quotient.is_empty() {
            return None;
        }

        let (rows, cols) = if quotient.len() <= b.len() { (&quotient, b) } else { (b, &quotient) };
        let product = match small_coeffs(rows).zip(small_coeffs(cols)) {
            Some((row_coeffs, col_coeffs)) => {
                let rows = Operand::new(&row_coeffs, rows.exps(), words);
                let cols = Operand::new(&col_coeffs, cols.exps(), words);
                self.heap::<WideAccumulator>(&rows, &cols, layout, Some(grant)).0
            }
            None => {
                let rows = Operand::new(rows.coeffs(), rows.exps(), words);
                let cols = Operand::new(cols.coeffs(), cols.exps(), words);
                self.heap::<BigAccumulator>(&rows, &cols, layout, Some(grant)).0
            }
        };
        let confirmed = product == *a;
        debug!(threads = grant.participants(), len_q = quotient.len(), confirmed, "split division");
        confirmed.then_some(quotient)
    }

    /// Divides into `q`, returning whether the division was exact.
    ///
    /// On `false`, `q` is the zero polynomial.
    ///
    /// # Errors
    ///
    /// See [`Engine::divides`]; `q` is left unchanged on error.
    pub fn divides_into(&self, q: &mut Polynomial, a: &Polynomial, b: &Polynomial) -> Result<bool, PolyError> {
        match self.divides(a, b)? {
            Some(quotient) => {
                *q = quotient;
                Ok(true)
            }
            None => {
                *q = Polynomial::zero(a.context());
                Ok(false)
            }
        }
    }
}

fn finish(
    layout: MonomialLayout,
    product: TermVec,
    strategy: MulStrategy,
    rows: &TermVec,
    cols: &TermVec,
    threads: usize,
) -> (Polynomial, MulStrategy) {
    debug!(
        %strategy,
        len_b = rows.len(),
        len_c = cols.len(),
        bits = layout.bits(),
        threads,
        terms = product.len(),
        "multiply"
    );
    (Polynomial::from_raw(layout, product), strategy)
}

/// Cheap necessary conditions for `b | a`; returns the failed one.
fn precheck(
    a: &Polynomial,
    b: &Polynomial,
    a_terms: &TermVec,
    b_terms: &TermVec,
    layout: &MonomialLayout,
) -> Option<&'static str> {
    if a.field_maxima().iter().zip(&b.field_maxima()).any(|(x, y)| y > x) {
        return Some("divisor degree exceeds dividend");
    }

    let mut scratch = vec![0u64; layout.words()];
    let mask = layout.overflow_mask();
    if !monomial_divides(&mut scratch, a_terms.exp(0), b_terms.exp(0), mask) {
        return Some("leading monomial");
    }
    let (a_last, b_last) = (a_terms.len() - 1, b_terms.len() - 1);
    if !monomial_divides(&mut scratch, a_terms.exp(a_last), b_terms.exp(b_last), mask) {
        return Some("trailing monomial");
    }
    if !a_terms.coeff(0).is_divisible_by(b_terms.coeff(0)) {
        return Some("leading coefficient");
    }
    if !a_terms.coeff(a_last).is_divisible_by(b_terms.coeff(b_last)) {
        return Some("trailing coefficient");
    }
    None
}

/// Runs the heap division, on word-sized coefficients when possible.
fn divide_heap(a: &TermVec, b: &TermVec, layout: &MonomialLayout) -> Option<TermVec> {
    let words = layout.words();
    let lead = b.coeff(0);

    if let Some((a_small, b_small)) = small_coeffs(a).zip(small_coeffs(b)) {
        let outcome = divides_heap::<WideAccumulator>(
            &Operand::new(&a_small, a.exps(), words),
            &Operand::new(&b_small, b.exps(), words),
            lead,
            layout,
        );
        match outcome {
            DivOutcome::Complete(q) => return Some(q),
            DivOutcome::Inexact => return None,
            DivOutcome::NeedsBig => debug!("quotient left the word range, restarting with big coefficients"),
        }
    }

    match divides_heap::<BigAccumulator>(
        &Operand::new(a.coeffs(), a.exps(), words),
        &Operand::new(b.coeffs(), b.exps(), words),
        lead,
        layout,
    ) {
        DivOutcome::Complete(q) => Some(q),
        DivOutcome::Inexact | DivOutcome::NeedsBig => None,
    }
}

/// Word-sized copies of the coefficients, if they all fit.
fn small_coeffs(terms: &TermVec) -> Option<Vec<i64>> {
    terms.coeffs().iter().map(Coeff::as_small).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PolyContext;
    use crate::ordering::MonomialOrder;

    fn poly(ctx: PolyContext, terms: &[(i64, &[u64])]) -> Polynomial {
        Polynomial::from_terms(ctx, terms.iter().copied()).unwrap()
    }

    fn uni() -> PolyContext {
        PolyContext::new(1, MonomialOrder::Lex)
    }

    #[test]
    fn test_binomial_product_and_quotient() {
        let ctx = uni();
        let b = poly(ctx, &[(1, &[2]), (2, &[1]), (1, &[0])]);
        let c = poly(ctx, &[(1, &[1]), (1, &[0])]);
        let expected = poly(ctx, &[(1, &[3]), (3, &[2]), (3, &[1]), (1, &[0])]);

        let engine = Engine::new();
        assert_eq!(engine.mul(&b, &c).unwrap(), expected);
        assert_eq!(engine.divides(&expected, &c).unwrap(), Some(b.clone()));

        let heap = Engine::with_config(EngineConfig::heap_only());
        let (product, strategy) = heap.mul_with_strategy(&b, &c).unwrap();
        assert_eq!(strategy, MulStrategy::Heap);
        assert_eq!(product, expected);
    }

    #[test]
    fn test_not_divisible() {
        let ctx = uni();
        let a = poly(ctx, &[(1, &[2]), (1, &[0])]);
        let b = poly(ctx, &[(1, &[1]), (1, &[0])]);

        let engine = Engine::new();
        assert_eq!(engine.divides(&a, &b).unwrap(), None);

        let mut q = Polynomial::var(ctx, 0);
        assert!(!engine.divides_into(&mut q, &a, &b).unwrap());
        assert!(q.is_zero());
    }

    #[test]
    fn test_zero_cases() {
        let ctx = PolyContext::new(2, MonomialOrder::Grevlex);
        let zero = Polynomial::zero(ctx);
        let x = Polynomial::var(ctx, 0);
        let engine = Engine::new();

        let (product, strategy) = engine.mul_with_strategy(&zero, &x).unwrap();
        assert!(product.is_zero());
        assert_eq!(strategy, MulStrategy::Zero);

        assert_eq!(engine.divides(&zero, &x).unwrap(), Some(zero.clone()));
        assert_eq!(engine.divides(&x, &zero), Err(PolyError::DivisionByZero));

        let mut q = x.clone();
        assert!(engine.divides_into(&mut q, &zero, &x).unwrap());
        assert!(q.is_zero());
    }

    #[test]
    fn test_strategy_selection() {
        let engine = Engine::new();

        let ctx = uni();
        let dense = poly(ctx, &[(1, &[3]), (-2, &[2]), (5, &[1]), (1, &[0])]);
        let (_, strategy) = engine.mul_with_strategy(&dense, &dense).unwrap();
        assert_eq!(strategy, MulStrategy::Dense);

        let sparse = poly(ctx, &[(1, &[1000]), (1, &[0])]);
        let (_, strategy) = engine.mul_with_strategy(&sparse, &sparse).unwrap();
        assert_eq!(strategy, MulStrategy::Array);

        let multi = PolyContext::new(3, MonomialOrder::Grevlex);
        let p = poly(multi, &[(1, &[1, 0, 0]), (1, &[0, 1, 0]), (1, &[0, 0, 1]), (1, &[0, 0, 0])]);
        let (_, strategy) = engine.mul_with_strategy(&p, &p).unwrap();
        assert_eq!(strategy, MulStrategy::Array);

        let big = Polynomial::from_terms(
            multi,
            [(&Coeff::from(i64::MAX) * &Coeff::from(3), [1u64, 0, 0]), (Coeff::from(1), [0, 0, 0])],
        )
        .unwrap();
        let (_, strategy) = engine.mul_with_strategy(&big, &p).unwrap();
        assert_eq!(strategy, MulStrategy::Heap);

        let (_, strategy) = engine.mul_with_strategy(&Polynomial::var(multi, 1), &p).unwrap();
        assert_eq!(strategy, MulStrategy::Monomial);
    }

    #[test]
    fn test_threaded_engine_matches() {
        let pool = WorkerPool::new(3).unwrap();
        let config = EngineConfig {
            thread_grain: 4,
            allow_array: false,
            ..EngineConfig::default()
        };
        let engine = Engine::with_config(config).with_pool(&pool);

        let ctx = PolyContext::new(3, MonomialOrder::Grlex);
        let base = poly(ctx, &[(1, &[1, 0, 0]), (2, &[0, 1, 0]), (-3, &[0, 0, 1]), (1, &[0, 0, 0])]);
        let mut p = base.clone();
        for _ in 0..4 {
            p = Engine::new().mul(&p, &base).unwrap();
        }
        assert!(p.len() >= 16);

        let (threaded, strategy) = engine.mul_with_strategy(&p, &p).unwrap();
        assert_eq!(strategy, MulStrategy::ThreadedHeap);
        let single = Engine::with_config(EngineConfig::heap_only()).mul(&p, &p).unwrap();
        assert_eq!(threaded, single);
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn test_threaded_division_matches() {
        let pool = WorkerPool::new(2).unwrap();
        let config = EngineConfig {
            thread_grain: 1,
            ..EngineConfig::default()
        };
        let threaded = Engine::with_config(config).with_pool(&pool);
        let single = Engine::new();

        let ctx = PolyContext::new(3, MonomialOrder::Grevlex);
        let base = poly(ctx, &[(2, &[1, 0, 0]), (-1, &[0, 1, 0]), (3, &[0, 0, 1]), (1, &[0, 0, 0])]);
        let mut p = base.clone();
        for _ in 0..3 {
            p = single.mul(&p, &base).unwrap();
        }
        let other = poly(ctx, &[(1, &[0, 2, 1]), (-5, &[1, 0, 0]), (7, &[0, 0, 0])]);
        let product = single.mul(&p, &other).unwrap();

        assert_eq!(threaded.divides(&product, &p).unwrap(), Some(other.clone()));
        assert_eq!(threaded.divides(&product, &other).unwrap(), Some(p.clone()));
        assert_eq!(
            threaded.divides(&product, &base).unwrap(),
            single.divides(&product, &base).unwrap()
        );

        let perturbed = product.add(&Polynomial::var(ctx, 1)).unwrap();
        assert_eq!(threaded.divides(&perturbed, &p).unwrap(), None);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_threaded_division_confirms_by_multiplying() {
        // the remainder of (x^2 + 1) / (x + 1) sits between the two runs
        let pool = WorkerPool::new(1).unwrap();
        let config = EngineConfig {
            thread_grain: 1,
            ..EngineConfig::default()
        };
        let engine = Engine::with_config(config).with_pool(&pool);
        let ctx = uni();
        let a = poly(ctx, &[(1, &[2]), (1, &[0])]);
        let b = poly(ctx, &[(1, &[1]), (1, &[0])]);

        assert_eq!(engine.divides(&a, &b).unwrap(), None);
        let square = engine.mul(&b, &b).unwrap();
        assert_eq!(engine.divides(&square, &b).unwrap(), Some(b.clone()));
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_mul_assign_and_into() {
        let ctx = PolyContext::new(2, MonomialOrder::Lex);
        let x = Polynomial::var(ctx, 0);
        let y = Polynomial::var(ctx, 1);
        let engine = Engine::new();

        let mut a = x.add(&y).unwrap();
        let copy = a.clone();
        engine.mul_assign(&mut a, &copy).unwrap();
        let expected = poly(ctx, &[(1, &[2, 0]), (2, &[1, 1]), (1, &[0, 2])]);
        assert_eq!(a, expected);

        let mut out = Polynomial::zero(ctx);
        engine.mul_into(&mut out, &x, &y).unwrap();
        assert_eq!(out, poly(ctx, &[(1, &[1, 1])]));
    }

    #[test]
    fn test_division_prechecks_and_big_restart() {
        let ctx = PolyContext::new(2, MonomialOrder::Grevlex);
        let engine = Engine::new();
        let x = Polynomial::var(ctx, 0);
        let y = Polynomial::var(ctx, 1);
        let xy = x.add(&y).unwrap();

        // degree of the divisor exceeds the dividend
        assert_eq!(engine.divides(&x, &xy.mul(&xy).unwrap()).unwrap(), None);
        // leading coefficient does not divide
        let two_x = x.scale(&Coeff::from(2));
        assert_eq!(engine.divides(&x.add(&y).unwrap(), &two_x.add(&y).unwrap()).unwrap(), None);

        // quotient coefficient 2^63 does not fit a word
        let a = poly(ctx, &[(i64::MIN, &[1, 0]), (i64::MIN, &[0, 1])]);
        let b = poly(ctx, &[(-1, &[1, 0]), (-1, &[0, 1])]);
        let q = engine.divides(&a, &b).unwrap().unwrap();
        let two_63 = -&Coeff::from(i64::MIN);
        assert_eq!(q, Polynomial::constant(ctx, two_63));
    }
}
