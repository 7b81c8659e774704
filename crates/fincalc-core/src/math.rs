//! Decimal math helpers shared by the calculators.
//!
//! Integer powers use repeated multiplication rather than `powd` to avoid
//! drift, and saturate at the Decimal bounds instead of panicking so the pure
//! calculators can accept any input snapshot.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::types::Rate;

/// Compute base^n for a non-negative integer exponent via iterative multiplication.
pub fn iterative_pow(base: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.saturating_mul(base);
        if result.is_zero() {
            break;
        }
    }
    result
}

/// Compute (1 + r)^n.
pub fn compound(rate: Rate, n: u32) -> Decimal {
    iterative_pow(Decimal::ONE.saturating_add(rate), n)
}

/// Grow `value` at `rate` for `n` periods.
pub fn grow(value: Decimal, rate: Rate, n: u32) -> Decimal {
    value.saturating_mul(compound(rate, n))
}

/// Deflate `value` by `rate` over `n` periods. None when the divisor collapses to zero.
pub fn deflate(value: Decimal, rate: Rate, n: u32) -> Option<Decimal> {
    let divisor = compound(rate, n);
    if divisor.is_zero() {
        return None;
    }
    value.checked_div(divisor)
}

/// `value × (1 + rate)^n`, or None if any step leaves the Decimal range.
pub fn checked_grow(value: Decimal, rate: Rate, n: u32) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(rate)?;
    let mut result = value;
    for _ in 0..n {
        result = result.checked_mul(base)?;
        if result.is_zero() {
            break;
        }
    }
    Some(result)
}

/// Fractional power for positive bases, used by CAGR. None on any domain or overflow failure.
pub fn checked_pow_frac(base: Decimal, exponent: Decimal) -> Option<Decimal> {
    if base <= Decimal::ZERO {
        return None;
    }
    base.checked_powd(exponent)
}
