//! Basis-point representation for fee and share percentages.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::PoolError;

/// Maximum value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Used for swap fee rates and meta-module fee shares.  All `u32` values
/// are structurally valid; values above 10 000 are nonsensical as
/// percentages and are rejected at the boundaries that care
/// (fee caps, fee-share caps).
///
/// # Examples
///
/// ```
/// use medusa_amm::domain::BasisPoints;
///
/// let bp = BasisPoints::new(30);
/// assert_eq!(bp.get(), 30);
/// assert!(bp.is_valid_percent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in the valid percentage range
    /// (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Computes `amount * (self / 10_000)` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the intermediate multiplication
    /// overflows.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        let bps = self.0 as u128;
        let raw = amount.get();

        let product = match raw.checked_mul(bps) {
            Some(v) => v,
            None => return Err(PoolError::Overflow("basis points apply overflow")),
        };

        let divisor = MAX_BPS as u128;

        match rounding {
            Rounding::Down => Ok(Amount::new(product / divisor)),
            Rounding::Up => {
                // Ceiling: (product + divisor - 1) / divisor, with an
                // overflow fallback near u128::MAX.
                match product.checked_add(divisor - 1) {
                    Some(n) => Ok(Amount::new(n / divisor)),
                    None => {
                        let q = product / divisor;
                        let r = product % divisor;
                        if r != 0 {
                            Ok(Amount::new(q + 1))
                        } else {
                            Ok(Amount::new(q))
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
