//! Tick-to-price conversion and tick-denominated amount arithmetic.
//!
//! These helpers implement the relationship `price = 1.0001^tick`, where
//! the price is the amount of token1 per unit of token0, plus the
//! direction-aware conversions the swap engine uses to settle quotes.
//!
//! # Functions
//!
//! - [`price_at_tick`] — computes `1.0001^tick` for a given [`Tick`].
//! - [`tick_at_price`] — computes the greatest tick whose price ≤ the
//!   given [`Price`].
//! - [`amount_out_at_tick`] / [`amount_in_at_tick`] — convert between the
//!   two tokens at a tick's price.
//!
//! # Rounding
//!
//! Amount conversion is asymmetric by design: output computed from input
//! rounds **down** (the pool never pays out more than the input is worth
//! at the tick), input computed from output rounds **up** (the pool never
//! accepts less input than the quoted output is worth).
//!
//! # Examples
//!
//! ```
//! use medusa_amm::domain::Tick;
//! use medusa_amm::math::{price_at_tick, tick_at_price};
//!
//! let tick = Tick::new(100).unwrap_or(Tick::ZERO);
//! let price = price_at_tick(tick).expect("valid tick produces valid price");
//! let round_trip = tick_at_price(price).expect("valid price produces valid tick");
//! assert_eq!(round_trip, tick);
//! ```

use crate::domain::{Amount, Price, Rounding, SwapDirection, Tick};
use crate::error::PoolError;

/// Base of the tick-price exponential: `price = BASE^tick`.
const BASE: f64 = 1.0001;

/// Tolerance for snapping a floating-point tick value to the nearest
/// integer.  This prevents round-trip errors caused by IEEE 754
/// rounding when converting `tick → price → tick`.
const SNAP_EPSILON: f64 = 1e-9;

/// Computes the price at a given tick: `price = 1.0001^tick`.
///
/// All valid [`Tick`] values produce finite, positive prices within the
/// `f64` representable range.
///
/// # Errors
///
/// Returns [`PoolError::PriceOutOfRange`] if the computed price is not
/// finite or is negative (should not occur for valid ticks, but guarded
/// for safety).
///
/// # Examples
///
/// ```
/// use medusa_amm::domain::Tick;
/// use medusa_amm::math::price_at_tick;
///
/// let price = price_at_tick(Tick::ZERO).expect("tick 0 is valid");
/// assert!((price.get() - 1.0).abs() < f64::EPSILON);
/// ```
#[must_use = "this returns the computed price and does not modify state"]
pub fn price_at_tick(tick: Tick) -> crate::error::Result<Price> {
    #[allow(clippy::cast_lossless)]
    let price_f64 = BASE.powf(tick.get() as f64);
    Price::new(price_f64)
}

/// Computes the greatest tick whose price is ≤ the given price.
///
/// Implements `floor(log_{1.0001}(price))` with a snap-to-nearest
/// adjustment (within `SNAP_EPSILON`) to guarantee round-trip
/// correctness: `tick_at_price(price_at_tick(t)) == t` for all valid
/// ticks.
///
/// # Errors
///
/// - [`PoolError::PriceOutOfRange`] if `price` is zero (logarithm
///   undefined).
/// - [`PoolError::TickOutOfRange`] if the resulting tick falls outside
///   the valid range.
#[must_use = "this returns the computed tick and does not modify state"]
pub fn tick_at_price(price: Price) -> crate::error::Result<Tick> {
    let p = price.get();
    if p <= 0.0 {
        return Err(PoolError::PriceOutOfRange(
            "price must be positive for tick conversion",
        ));
    }

    let raw = p.ln() / BASE.ln();

    // Snap to nearest integer when within epsilon to avoid round-trip
    // errors from IEEE 754 imprecision.
    let rounded = raw.round();
    let tick_f64 = if (raw - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        raw.floor()
    };

    if !tick_f64.is_finite() {
        return Err(PoolError::TickOutOfRange(
            "price produces non-finite tick value",
        ));
    }

    // Values outside i32 are caught by Tick::new().
    #[allow(clippy::cast_possible_truncation)]
    let tick_i32 = tick_f64 as i32;
    Tick::new(tick_i32)
}

/// Converts an input amount to the output amount it buys at a tick's
/// price, rounding **down**.
///
/// For [`SwapDirection::ZeroForOne`] the input is token0 and the output
/// is token1 (`out = in * price`); for [`SwapDirection::OneForZero`] the
/// roles are reversed (`out = in / price`).
///
/// # Errors
///
/// - [`PoolError::Overflow`] if the scaled amount exceeds `u128`.
/// - [`PoolError::DivisionByZero`] if the tick price is zero when
///   inverting (cannot occur for valid ticks, guarded for safety).
#[must_use = "this returns the computed amount and does not modify state"]
pub fn amount_out_at_tick(
    direction: SwapDirection,
    amount_in: Amount,
    tick: Tick,
) -> crate::error::Result<Amount> {
    let price = price_at_tick(tick)?;
    match direction {
        SwapDirection::ZeroForOne => price.multiply(amount_in, Rounding::Down),
        SwapDirection::OneForZero => price.inverse()?.multiply(amount_in, Rounding::Down),
    }
}

/// Converts an output amount to the input amount owed for it at a tick's
/// price, rounding **up**.
///
/// Exact inverse orientation of [`amount_out_at_tick`].
///
/// # Errors
///
/// - [`PoolError::Overflow`] if the scaled amount exceeds `u128`.
/// - [`PoolError::DivisionByZero`] if the tick price is zero when
///   inverting (cannot occur for valid ticks, guarded for safety).
#[must_use = "this returns the computed amount and does not modify state"]
pub fn amount_in_at_tick(
    direction: SwapDirection,
    amount_out: Amount,
    tick: Tick,
) -> crate::error::Result<Amount> {
    let price = price_at_tick(tick)?;
    match direction {
        SwapDirection::ZeroForOne => price.inverse()?.multiply(amount_out, Rounding::Up),
        SwapDirection::OneForZero => price.multiply(amount_out, Rounding::Up),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn tick(v: i32) -> Tick {
        let Ok(t) = Tick::new(v) else {
            panic!("valid tick");
        };
        t
    }

    // -- price_at_tick ------------------------------------------------------

    #[test]
    fn tick_zero_gives_price_one() {
        let Ok(price) = price_at_tick(Tick::ZERO) else {
            panic!("expected Ok");
        };
        assert!((price.get() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn positive_tick_gives_price_above_one() {
        let Ok(price) = price_at_tick(tick(1000)) else {
            panic!("expected Ok");
        };
        assert!(price.get() > 1.0);
    }

    #[test]
    fn negative_tick_gives_price_below_one() {
        let Ok(price) = price_at_tick(tick(-1000)) else {
            panic!("expected Ok");
        };
        assert!(price.get() > 0.0 && price.get() < 1.0);
    }

    #[test]
    fn extreme_ticks_produce_finite_prices() {
        let Ok(lo) = price_at_tick(Tick::MIN) else {
            panic!("expected Ok for MIN tick");
        };
        let Ok(hi) = price_at_tick(Tick::MAX) else {
            panic!("expected Ok for MAX tick");
        };
        assert!(lo.get() > 0.0 && lo.is_finite());
        assert!(hi.get() > 1.0 && hi.is_finite());
    }

    // -- tick_at_price ------------------------------------------------------

    #[test]
    fn price_one_gives_tick_zero() {
        let Ok(t) = tick_at_price(Price::ONE) else {
            panic!("expected Ok");
        };
        assert_eq!(t.get(), 0);
    }

    #[test]
    fn price_zero_is_error() {
        assert!(tick_at_price(Price::ZERO).is_err());
    }

    #[test]
    fn tick_at_known_price_2() {
        // log_{1.0001}(2) ≈ 6931.47 → floor 6931
        let Ok(price) = Price::new(2.0) else {
            panic!("expected Ok");
        };
        let Ok(t) = tick_at_price(price) else {
            panic!("expected Ok");
        };
        assert_eq!(t.get(), 6931);
    }

    #[test]
    fn tick_at_price_floors_non_aligned() {
        let Ok(price) = Price::new(1.00005) else {
            panic!("expected Ok");
        };
        let Ok(t) = tick_at_price(price) else {
            panic!("expected Ok");
        };
        assert_eq!(t.get(), 0);
    }

    // -- Round-trip ----------------------------------------------------------

    #[test]
    fn round_trip_sample_ticks() {
        for v in [
            -887_272, -500_000, -10_000, -101, -1, 0, 1, 99, 100, 101, 10_000, 500_000, 887_272,
        ] {
            let t = tick(v);
            let Ok(price) = price_at_tick(t) else {
                panic!("expected Ok for price_at_tick({v})");
            };
            let Ok(rt) = tick_at_price(price) else {
                panic!("expected Ok for tick_at_price");
            };
            assert_eq!(rt, t, "round-trip failed for tick {v}");
        }
    }

    // -- Monotonicity ---------------------------------------------------------

    #[test]
    fn monotonicity_increasing() {
        let ticks: &[i32] = &[-887_272, -10_000, -1, 0, 1, 10_000, 887_272];
        let prices: Vec<f64> = ticks
            .iter()
            .map(|&v| {
                let Ok(price) = price_at_tick(tick(v)) else {
                    panic!("expected Ok");
                };
                price.get()
            })
            .collect();
        for pair in prices.windows(2) {
            let [prev, next] = pair else {
                panic!("windows(2) should yield pairs");
            };
            assert!(next > prev, "prices must be strictly increasing");
        }
    }

    #[test]
    fn adjacent_ticks_have_distinct_prices() {
        for v in [-100_000, -1, 0, 250_000] {
            let Ok(a) = price_at_tick(tick(v)) else {
                panic!("expected Ok");
            };
            let Ok(b) = price_at_tick(tick(v + 1)) else {
                panic!("expected Ok");
            };
            assert!(b.get() > a.get(), "ticks {v} and {} share a price", v + 1);
        }
    }

    // -- Amount conversion ----------------------------------------------------

    #[test]
    fn amount_out_at_neutral_tick_is_identity() {
        let Ok(out) = amount_out_at_tick(SwapDirection::ZeroForOne, Amount::new(1_000), Tick::ZERO)
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(1_000));
    }

    #[test]
    fn amount_out_rounds_down() {
        // At tick 6931 price ≈ 1.99997; 1000 * p = 1999.97 → 1999
        let Ok(out) = amount_out_at_tick(SwapDirection::ZeroForOne, Amount::new(1_000), tick(6931))
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(1_999));
    }

    #[test]
    fn amount_in_rounds_up() {
        // Inverse of the case above: 1999 / p = 999.51 → 1000
        let Ok(input) = amount_in_at_tick(SwapDirection::ZeroForOne, Amount::new(1_999), tick(6931))
        else {
            panic!("expected Ok");
        };
        assert_eq!(input, Amount::new(1_000));
    }

    #[test]
    fn one_for_zero_inverts_orientation() {
        // Selling token1 at tick 6931: out token0 = in / p
        let Ok(out) = amount_out_at_tick(SwapDirection::OneForZero, Amount::new(2_000), tick(6931))
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(1_000));
    }

    #[test]
    fn neutral_tick_conversions_are_exact() {
        // price = 1.0 exactly at tick 0, so both rounding directions
        // agree and conversion is the identity.
        let out = Amount::new(12_345);
        let Ok(input) = amount_in_at_tick(SwapDirection::ZeroForOne, out, Tick::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(input, out);
        let Ok(back) = amount_out_at_tick(SwapDirection::OneForZero, out, Tick::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(back, out);
    }

    #[test]
    fn rounding_splits_away_from_the_swapper() {
        // At tick 6931 (price ≈ 1.99984) the conversions land strictly
        // between integers, so the asymmetric rounding is observable:
        // output floors, input ceils.
        let Ok(out) = amount_out_at_tick(SwapDirection::ZeroForOne, Amount::new(1_001), tick(6931))
        else {
            panic!("expected Ok");
        };
        // 1001 * 1.99984 ≈ 2001.83 → 2001
        assert_eq!(out, Amount::new(2_001));
        let Ok(input) = amount_in_at_tick(SwapDirection::ZeroForOne, Amount::new(2_001), tick(6931))
        else {
            panic!("expected Ok");
        };
        // 2001 / 1.99984 ≈ 1000.58 → 1001
        assert_eq!(input, Amount::new(1_001));
    }

    #[test]
    fn amount_out_overflow_rejected() {
        assert!(amount_out_at_tick(SwapDirection::ZeroForOne, Amount::MAX, Tick::MAX).is_err());
    }
}
