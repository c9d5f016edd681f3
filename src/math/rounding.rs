//! Integer division helpers with explicit rounding.
//!
//! This module provides [`div_round`] and [`mul_div`], the low-level
//! building blocks used by [`Amount`](crate::domain::Amount) and the fee
//! distribution passes.
//!
//! # Convention
//!
//! **Always round against the swapper** (protocol-favorable):
//!
//! | Quantity | Direction | Rationale |
//! |----------|-----------|-----------|
//! | Output amount | [`Rounding::Down`] | Swapper receives less |
//! | Input amount | [`Rounding::Up`] | Swapper pays more |
//! | Fee amount | [`Rounding::Up`] | Protocol takes more |
//!
//! Per-module fee *shares* round [`Rounding::Down`] with the residual
//! retained by the pool manager, so share distribution can never exceed
//! the fee collected.

use crate::domain::Rounding;

/// Mask selecting the low 64 bits of a `u128`.
const LO_MASK: u128 = 0xFFFF_FFFF_FFFF_FFFF;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
///
/// # Examples
///
/// ```
/// use medusa_amm::domain::Rounding;
/// use medusa_amm::math::div_round;
///
/// assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
/// assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
/// assert_eq!(div_round(10, 0, Rounding::Down), None);
/// ```
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    match rounding {
        Rounding::Down => Some(numerator / denominator),
        Rounding::Up => {
            // Ceiling division: (n + d - 1) / d, with a fallback when the
            // adjusted numerator would overflow.
            match numerator.checked_add(denominator - 1) {
                Some(adjusted) => Some(adjusted / denominator),
                None => {
                    let q = numerator / denominator;
                    let r = numerator % denominator;
                    if r != 0 {
                        Some(q + 1)
                    } else {
                        Some(q)
                    }
                }
            }
        }
    }
}

/// Computes `a * b / d` with explicit rounding, carrying the intermediate
/// product in 256 bits so it never overflows.
///
/// Returns [`None`] if `d` is zero or the quotient itself does not fit
/// in a `u128`.
///
/// # Examples
///
/// ```
/// use medusa_amm::domain::Rounding;
/// use medusa_amm::math::mul_div;
///
/// assert_eq!(mul_div(100, 40, 3, Rounding::Down), Some(1333));
/// assert_eq!(mul_div(100, 40, 3, Rounding::Up), Some(1334));
///
/// // Intermediate product exceeds u128; the quotient still fits.
/// assert_eq!(
///     mul_div(u128::MAX / 2, 4, 2, Rounding::Down),
///     Some(u128::MAX - 1)
/// );
/// ```
#[must_use]
pub const fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Option<u128> {
    if d == 0 {
        return None;
    }
    // Fast path: the product fits in u128.
    if let Some(product) = a.checked_mul(b) {
        return div_round(product, d, rounding);
    }

    let (hi, lo) = widening_mul(a, b);
    // Quotient would need 2^128 or more.
    if hi >= d {
        return None;
    }
    let (quotient, remainder) = div_rem_wide(hi, lo, d);
    if remainder != 0 && matches!(rounding, Rounding::Up) {
        quotient.checked_add(1)
    } else {
        Some(quotient)
    }
}

/// Full 256-bit product of two `u128` values as `(hi, lo)` halves.
const fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    let a_lo = a & LO_MASK;
    let a_hi = a >> 64;
    let b_lo = b & LO_MASK;
    let b_hi = b >> 64;

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    // Sum of the three middle terms; at most 3 * (2^64 - 1)^... the
    // individual addends are < 2^64 so the sum fits comfortably.
    let mid = (ll >> 64) + (lh & LO_MASK) + (hl & LO_MASK);

    let lo = (ll & LO_MASK) | ((mid & LO_MASK) << 64);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// Divides the 256-bit value `hi * 2^128 + lo` by `d` via binary long
/// division.  Requires `hi < d` so the quotient fits in a `u128`.
const fn div_rem_wide(hi: u128, lo: u128, d: u128) -> (u128, u128) {
    let mut rem = hi;
    let mut quotient: u128 = 0;
    let mut i = 0;
    while i < 128 {
        let bit = (lo >> (127 - i)) & 1;
        // rem' = rem * 2 + bit may exceed 2^128 by exactly the carried-out
        // top bit; in that case the subtraction of d is always due.
        let carry = rem >> 127;
        rem = (rem << 1) | bit;
        quotient <<= 1;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient |= 1;
        }
        i += 1;
    }
    (quotient, rem)
}
