//! Swap request parameters.

use crate::domain::{Address, Amount, SwapDirection, Tick};
use crate::error::PoolError;

/// A caller's swap request.
///
/// Self-contained invariants (non-zero amounts and addresses) are
/// validated at construction; registry-dependent invariants (context
/// length, base-ordering permutation, limit-tick side) are validated by
/// the pool when the swap is submitted.
///
/// # Fields
///
/// - `base_ordering` — the order in which base modules are asked to
///   quote, as a permutation of `0..active_base_count`.  Meta modules
///   always quote after all base modules, in registry order.
/// - `context` — one opaque byte blob per active module, indexed by
///   registry position, forwarded verbatim into each module's
///   [`QuoteRequest`](crate::traits::QuoteRequest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    direction: SwapDirection,
    amount_in: Amount,
    min_amount_out: Amount,
    deadline: u64,
    sender: Address,
    recipient: Address,
    limit_tick: Tick,
    base_ordering: Vec<usize>,
    context: Vec<Vec<u8>>,
    fee_context: Vec<u8>,
}

impl SwapParams {
    /// Creates a swap request.
    ///
    /// `fee_context` is the opaque blob forwarded to the fee module (if
    /// one is installed); pass an empty vector otherwise.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ZeroAmount`] if `amount_in` is zero.
    /// - [`PoolError::InvalidRecipient`] if `sender` or `recipient` is
    ///   the zero address.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        direction: SwapDirection,
        amount_in: Amount,
        min_amount_out: Amount,
        deadline: u64,
        sender: Address,
        recipient: Address,
        limit_tick: Tick,
        base_ordering: Vec<usize>,
        context: Vec<Vec<u8>>,
        fee_context: Vec<u8>,
    ) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(PoolError::ZeroAmount("amount_in must be non-zero"));
        }
        if sender.is_zero() {
            return Err(PoolError::InvalidRecipient("sender must be non-zero"));
        }
        if recipient.is_zero() {
            return Err(PoolError::InvalidRecipient("recipient must be non-zero"));
        }
        Ok(Self {
            direction,
            amount_in,
            min_amount_out,
            deadline,
            sender,
            recipient,
            limit_tick,
            base_ordering,
            context,
            fee_context,
        })
    }

    /// The swap direction.
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// The gross input amount, fee included.
    #[must_use]
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// The minimum acceptable output.
    #[must_use]
    pub const fn min_amount_out(&self) -> Amount {
        self.min_amount_out
    }

    /// The request expiry timestamp.
    #[must_use]
    pub const fn deadline(&self) -> u64 {
        self.deadline
    }

    /// The swap originator.
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// The output recipient.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }

    /// The tick the swap may not pass.
    #[must_use]
    pub const fn limit_tick(&self) -> Tick {
        self.limit_tick
    }

    /// The caller's base-module quoting order.
    #[must_use]
    pub fn base_ordering(&self) -> &[usize] {
        &self.base_ordering
    }

    /// The per-module opaque context blobs, indexed by registry position.
    #[must_use]
    pub fn context(&self) -> &[Vec<u8>] {
        &self.context
    }

    /// The opaque context forwarded to the fee module.
    #[must_use]
    pub fn fee_context(&self) -> &[u8] {
        &self.fee_context
    }
}
