//! Fixed-point exchange rate between the two pool tokens.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::PoolError;

/// Exchange rate between the pool tokens as a dimensionless ratio
/// (token1 per token0).
///
/// Wraps an `f64` value that must be finite and non-negative.  Price
/// values are only ever produced by the tick-price mapping, so every
/// `Price` in circulation corresponds to a tick on the grid.
///
/// # Examples
///
/// ```
/// use medusa_amm::domain::Price;
///
/// let price = Price::new(1.5);
/// assert!(price.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Price ratio of 1:1.
    pub const ONE: Self = Self(1.0);

    /// Price ratio of zero.
    pub const ZERO: Self = Self(0.0);

    /// Creates a new `Price` from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PriceOutOfRange`] if the value is negative,
    /// NaN, or infinite.
    pub fn new(value: f64) -> crate::error::Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(PoolError::PriceOutOfRange(
                "price must be finite and non-negative",
            ));
        }
        Ok(Self(value))
    }

    /// Returns the underlying `f64` value.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// Returns `true` if the price is finite.
    ///
    /// Always returns `true` for a properly constructed `Price`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Scales an [`Amount`] by this price with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the result is not finite or
    /// exceeds the representable `u128` range.
    pub fn multiply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        #[allow(clippy::cast_precision_loss)]
        let result = self.0 * amount.get() as f64;
        if !result.is_finite() || result < 0.0 {
            return Err(PoolError::Overflow("price multiply overflow"));
        }

        let rounded = match rounding {
            Rounding::Down => result.floor(),
            Rounding::Up => result.ceil(),
        };

        #[allow(clippy::cast_precision_loss)]
        let max = u128::MAX as f64;
        if rounded > max {
            return Err(PoolError::Overflow("price multiply exceeds maximum amount"));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let int_val = rounded as u128;
        Ok(Amount::new(int_val))
    }

    /// Computes the reciprocal price (`1 / self`).
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::DivisionByZero`] if the price is zero.
    pub fn inverse(&self) -> crate::error::Result<Self> {
        if self.0 == 0.0 {
            return Err(PoolError::DivisionByZero);
        }
        Self::new(1.0 / self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- Construction -------------------------------------------------------

    #[test]
    fn valid_positive() {
        let Ok(p) = Price::new(1.5) else {
            panic!("expected Ok");
        };
        assert!((p.get() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn valid_zero() {
        assert!(Price::new(0.0).is_ok());
    }

    #[test]
    fn negative_rejected() {
        assert!(Price::new(-1.0).is_err());
    }

    #[test]
    fn nan_rejected() {
        assert!(Price::new(f64::NAN).is_err());
    }

    #[test]
    fn infinity_rejected() {
        assert!(Price::new(f64::INFINITY).is_err());
    }

    // -- multiply -----------------------------------------------------------

    #[test]
    fn multiply_round_down() {
        let Ok(p) = Price::new(1.5) else {
            panic!("expected Ok");
        };
        let Ok(r) = p.multiply(Amount::new(3), Rounding::Down) else {
            panic!("expected Ok");
        };
        // 1.5 * 3 = 4.5 → 4
        assert_eq!(r, Amount::new(4));
    }

    #[test]
    fn multiply_round_up() {
        let Ok(p) = Price::new(1.5) else {
            panic!("expected Ok");
        };
        let Ok(r) = p.multiply(Amount::new(3), Rounding::Up) else {
            panic!("expected Ok");
        };
        assert_eq!(r, Amount::new(5));
    }

    #[test]
    fn multiply_by_one_is_identity() {
        let Ok(r) = Price::ONE.multiply(Amount::new(1_000), Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(r, Amount::new(1_000));
    }

    #[test]
    fn multiply_overflow_rejected() {
        let Ok(p) = Price::new(1e30) else {
            panic!("expected Ok");
        };
        assert!(p.multiply(Amount::MAX, Rounding::Down).is_err());
    }

    // -- inverse ------------------------------------------------------------

    #[test]
    fn inverse_of_two() {
        let Ok(p) = Price::new(2.0) else {
            panic!("expected Ok");
        };
        let Ok(inv) = p.inverse() else {
            panic!("expected Ok");
        };
        assert!((inv.get() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn inverse_of_zero_rejected() {
        assert!(Price::ZERO.inverse().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Price::ONE), "1");
    }
}
