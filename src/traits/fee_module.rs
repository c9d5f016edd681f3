//! Pluggable swap-fee rate module.
//!
//! The pool consults an optional [`SwapFeeModule`] at the start of every
//! swap to price the fee rate dynamically (volatility-aware fees,
//! sender-tiered discounts, and so on).  Pools without a fee module use
//! the constant default rate from their configuration.  The module's
//! internal logic is its own concern; only this boundary is specified.

use crate::domain::{Address, Amount, BasisPoints, SwapDirection, Tick};
use crate::error::PoolError;

/// A fee module's rate decision for one swap.
///
/// The `payload` is opaque state the module wants echoed back in its
/// end-of-swap callback (for example, the inputs it priced the rate
/// from).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapFeeQuote {
    bips: BasisPoints,
    payload: Vec<u8>,
}

impl SwapFeeQuote {
    /// Creates a fee quote with an opaque callback payload.
    #[must_use]
    pub const fn new(bips: BasisPoints, payload: Vec<u8>) -> Self {
        Self { bips, payload }
    }

    /// Creates a fee quote with no payload.
    #[must_use]
    pub const fn flat(bips: BasisPoints) -> Self {
        Self {
            bips,
            payload: Vec::new(),
        }
    }

    /// The fee rate in basis points.
    #[must_use]
    pub const fn bips(&self) -> BasisPoints {
        self.bips
    }

    /// The opaque payload echoed into the end-of-swap callback.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Contract for pluggable swap-fee pricing.
pub trait SwapFeeModule {
    /// Prices the fee rate for one swap.
    ///
    /// # Errors
    ///
    /// Any error aborts the swap.  Rates above the protocol cap are
    /// rejected by the pool with
    /// [`PoolError::FeeRateTooHigh`].
    fn fee_in_bips(
        &mut self,
        direction: SwapDirection,
        amount_in: Amount,
        sender: Address,
        context: &[u8],
    ) -> Result<SwapFeeQuote, PoolError>;

    /// End-of-swap notification with the realized fee.
    fn on_swap_end(
        &mut self,
        _effective_fee: Amount,
        _end_tick: Tick,
        _amount_in_used: Amount,
        _amount_out: Amount,
        _payload: &[u8],
    ) {
    }
}
