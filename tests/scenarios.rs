//! Cross-crate scenarios: cache reconfiguration, the approximator under
//! scoped contexts, and the codec on context-produced values.

use num_bigint::BigInt;
use num_rational::BigRational;

use mpnum_codec::{to_binary, value_from_binary, Kind, Value};
use mpnum_core::{
    best_rational, cache_stats, current_context, get_cache, local_context, set_cache,
    Approximation, BigFloat, Condition, ContextError, ContextOverrides, Round, Tolerance,
};
use mpnum_memory::PoolError;

fn ratio(p: i64, q: i64) -> BigRational {
    BigRational::new(BigInt::from(p), BigInt::from(q))
}

#[test]
fn rejected_cache_change_leaves_limits() {
    set_cache(0, 128).unwrap();
    assert_eq!(get_cache(), (0, 128));

    assert_eq!(set_cache(-1, 128), Err(PoolError::InvalidCacheSize(-1)));
    assert_eq!(get_cache(), (0, 128));

    assert_eq!(set_cache(0, 16_385), Err(PoolError::InvalidObjectSize(16_385)));
    assert_eq!(set_cache(1001, 0), Err(PoolError::InvalidCacheSize(1001)));
    assert_eq!(get_cache(), (0, 128));

    assert_eq!(set_cache(1000, 16_384), Ok((0, 128)));
    assert_eq!(get_cache(), (1000, 16_384));
}

#[test]
fn one_tenth_within_one_part_per_billion() {
    let x = BigFloat::from_f64(0.1);
    let tolerance = Tolerance::from_f64(1e-9).unwrap();
    let result = best_rational(&x, &tolerance, false).unwrap();
    assert_eq!(result, Approximation::Ratio(ratio(1, 10)));
}

#[test]
fn approximator_reuses_cached_registers() {
    set_cache(100, 128).unwrap();
    let before = cache_stats().integers;
    let x = BigFloat::from_f64(std::f64::consts::E);
    best_rational(&x, &Tolerance::Exponent(-30), false).unwrap();
    best_rational(&x, &Tolerance::Exponent(-30), false).unwrap();
    let after = cache_stats().integers;
    assert!(after.hits >= before.hits + 6);
}

#[test]
fn scoped_precision_drives_approximation() {
    let pi = std::f64::consts::PI;
    let outer = current_context();
    {
        let _guard = local_context(&ContextOverrides {
            precision: Some(10),
            ..ContextOverrides::default()
        })
        .unwrap();
        let mut ctx = current_context();
        let result = ctx.best_rational_f64(pi, &Tolerance::Precision, false).unwrap();
        assert_eq!(result.to_rational(), ratio(22, 7));
    }
    assert_eq!(current_context(), outer);
}

#[test]
fn context_survives_a_trapped_error() {
    let outer = current_context();
    let result = (|| -> Result<BigFloat, ContextError> {
        let _guard = local_context(&ContextOverrides {
            round: Some(Round::Up),
            traps: Some(mpnum_core::Conditions {
                divzero: true,
                ..mpnum_core::Conditions::NONE
            }),
            ..ContextOverrides::default()
        })?;
        let mut ctx = current_context();
        let one = ctx.from_integer(&BigInt::from(1))?;
        let zero = BigFloat::zero(false, 53);
        ctx.div(&one, &zero)
    })();
    assert_eq!(result, Err(ContextError::DivisionByZero));
    assert_eq!(current_context(), outer);
    assert!(!current_context().flags().get(Condition::DivByZero));
}

#[test]
fn context_values_round_trip_through_codec() {
    let mut ctx = current_context();
    ctx.set_precision(200).unwrap();
    let third = ctx.from_rational(&ratio(1, 3)).unwrap();
    let two = ctx.from_integer(&BigInt::from(2)).unwrap();
    let root = ctx.sqrt(&two).unwrap();
    assert!(ctx.flags().inexact);

    for value in [third, root] {
        let bytes = to_binary(&Value::Float(value.clone())).unwrap();
        let Value::Float(back) = value_from_binary(&bytes, Kind::Float).unwrap() else {
            panic!("expected a float");
        };
        assert_eq!(back, value);
        assert_eq!(back.prec(), 200);
    }

    let three_quarters = ctx.from_f64(0.75).unwrap();
    let approx = best_rational(&three_quarters, &Tolerance::Precision, false)
        .unwrap()
        .to_rational();
    assert_eq!(approx, ratio(3, 4));
    let bytes = to_binary(&Value::Rational(approx.clone())).unwrap();
    assert_eq!(
        value_from_binary(&bytes, Kind::Rational).unwrap(),
        Value::Rational(approx)
    );
}
