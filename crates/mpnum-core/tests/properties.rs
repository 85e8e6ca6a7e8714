//! Property-based tests for the float layer, the context and the approximator.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use proptest::prelude::*;

use mpnum_core::{
    best_rational, current_context, local_context, BigFloat, Context, ContextOverrides, Round,
    Tolerance,
};

fn finite_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e100f64..1e100,
        -1.0f64..1.0,
        (-1_000_000i64..1_000_000).prop_map(|n| n as f64),
    ]
}

fn round_mode() -> impl Strategy<Value = Round> {
    prop::sample::select(Round::ALL.to_vec())
}

fn relative_error(x: &BigRational, r: &BigRational) -> BigRational {
    ((x - r) / x).abs()
}

/// Whether some fraction with denominator `q` lies within `bound` of `x`.
fn denominator_fits(x: &BigRational, q: i64, bound: &BigRational) -> bool {
    let q = BigInt::from(q);
    let scaled = x * BigRational::from_integer(q.clone());
    let floor = scaled.floor().to_integer();
    [floor.clone(), floor + 1].into_iter().any(|p| {
        let candidate = BigRational::new(p, q.clone());
        relative_error(x, &candidate) <= *bound
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// At 53 bits with round-to-nearest, arithmetic matches `f64` bit for bit.
    #[test]
    fn arithmetic_matches_f64(a in finite_f64(), b in finite_f64()) {
        let mut ctx = Context::default();
        let (x, y) = (BigFloat::from_f64(a), BigFloat::from_f64(b));
        prop_assert_eq!(ctx.add(&x, &y).unwrap().to_f64().to_bits(), (a + b).to_bits());
        prop_assert_eq!(ctx.sub(&x, &y).unwrap().to_f64().to_bits(), (a - b).to_bits());
        prop_assert_eq!(ctx.mul(&x, &y).unwrap().to_f64().to_bits(), (a * b).to_bits());
        if b != 0.0 {
            prop_assert_eq!(ctx.div(&x, &y).unwrap().to_f64().to_bits(), (a / b).to_bits());
        }
        let root = ctx.sqrt(&x.abs()).unwrap();
        prop_assert_eq!(root.to_f64().to_bits(), a.abs().sqrt().to_bits());
    }

    /// Directed roundings bracket the exact result.
    #[test]
    fn directed_rounding_brackets(a in finite_f64(), b in finite_f64(), prec in 2u32..80) {
        prop_assume!(b != 0.0);
        let mut ctx = Context::default();
        ctx.set_precision(i64::from(prec)).unwrap();
        let (x, y) = (BigFloat::from_f64(a), BigFloat::from_f64(b));
        ctx.set_round(Round::Down);
        let low = ctx.div(&x, &y).unwrap();
        ctx.set_round(Round::Up);
        let high = ctx.div(&x, &y).unwrap();
        let exact = x.to_rational().unwrap() / y.to_rational().unwrap();
        prop_assert!(low.to_rational().unwrap() <= exact);
        prop_assert!(high.to_rational().unwrap() >= exact);
        prop_assert_eq!(low.prec(), prec);
    }

    /// Displayed values parse back to the same value.
    #[test]
    fn display_parse_round_trip(a in finite_f64()) {
        let x = BigFloat::from_f64(a);
        let mut ctx = Context::default();
        let back = ctx.parse(&x.to_string()).unwrap();
        prop_assert_eq!(back.to_f64().to_bits(), a.to_bits());
    }

    /// The result honors the bound, and no smaller denominator does.
    #[test]
    fn approximation_is_within_bound_and_minimal(a in -1000.0f64..1000.0, bits in 4i64..16) {
        prop_assume!(a != 0.0);
        let x = BigFloat::from_f64(a);
        let exact = x.to_rational().unwrap();
        let result = best_rational(&x, &Tolerance::Exponent(-bits), false).unwrap();
        let r = result.to_rational();
        let bound = BigRational::new(BigInt::from(1), BigInt::from(1) << bits);
        prop_assert!(relative_error(&exact, &r) <= bound);

        let q = r.denom().to_i64().unwrap();
        for smaller in 1..q {
            prop_assert!(!denominator_fits(&exact, smaller, &bound), "q'={} beats q={}", smaller, q);
        }
    }

    /// Same with an explicit bound of arbitrary digits.
    #[test]
    fn relative_bound_is_exact(a in 0.1f64..100.0, bound in 1e-6f64..0.01) {
        let x = BigFloat::from_f64(a);
        let exact = x.to_rational().unwrap();
        let eps = BigFloat::from_f64(bound);
        let limit = eps.to_rational().unwrap();
        let result = best_rational(&x, &Tolerance::Relative(eps), false).unwrap();
        let r = result.to_rational();
        prop_assert!(relative_error(&exact, &r) <= limit);

        let q = r.denom().to_i64().unwrap();
        for smaller in 1..q {
            prop_assert!(!denominator_fits(&exact, smaller, &limit), "q'={} beats q={}", smaller, q);
        }
    }

    /// A canonical fraction within tolerance comes back unchanged.
    #[test]
    fn approximation_is_stable_on_exact_input(p in -500i64..500, q in 1i64..500) {
        let ratio = BigRational::new(BigInt::from(p), BigInt::from(q));
        prop_assume!(!ratio.is_zero());
        let mut ctx = Context::default();
        ctx.set_precision(120).unwrap();
        let x = ctx.from_rational(&ratio).unwrap();
        let result = best_rational(&x, &Tolerance::Exponent(-60), false).unwrap();
        prop_assert_eq!(result.to_rational(), ratio);
    }

    /// Nested local contexts restore the exact prior context.
    #[test]
    fn local_contexts_nest(
        precisions in prop::collection::vec(1i64..500, 1..6),
        modes in prop::collection::vec(round_mode(), 1..6),
    ) {
        let before = current_context();
        {
            let mut guards = Vec::new();
            for (prec, round) in precisions.iter().zip(&modes) {
                let overrides = ContextOverrides {
                    precision: Some(*prec),
                    round: Some(*round),
                    ..ContextOverrides::default()
                };
                guards.push(local_context(&overrides).unwrap());
                prop_assert_eq!(current_context().precision(), u32::try_from(*prec).unwrap());
            }
            while let Some(guard) = guards.pop() {
                drop(guard);
            }
        }
        prop_assert_eq!(current_context(), before);
    }

    /// Rational conversions are exact at sufficient precision.
    #[test]
    fn rational_round_trip(a in finite_f64()) {
        let x = BigFloat::from_f64(a);
        let r = x.to_rational().unwrap();
        let (y, dir) = BigFloat::with_ratio(&r, 53, Round::Nearest);
        prop_assert_eq!(dir, std::cmp::Ordering::Equal);
        prop_assert_eq!(y, x);
    }
}
