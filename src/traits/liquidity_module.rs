//! Core contract between the pool and its liquidity modules.
//!
//! A [`LiquidityModule`] (ALM — algorithmic liquidity module) is an
//! independently-coded strategy object that holds reserves of the pool's
//! two tokens and prices them.  The pool never implements a curve of its
//! own: during a swap it solicits one [`LiquidityQuote`] from every
//! participating module, validates the quote levels round by round, and
//! settles them against the remaining input.
//!
//! # Call Discipline
//!
//! All calls are ordinary in-process method invocations, fully
//! synchronous.  A module is consulted **exactly once per swap**
//! ([`quote`](LiquidityModule::quote)); multi-round participation happens
//! through pre-computed continuation levels inside the returned quote.
//! A misbehaving module can only fail the enclosing swap by returning an
//! error — it can never leave partial pool state behind, because the
//! engine stages all per-swap accounting and commits atomically.
//!
//! # Side Effects
//!
//! From the pool's perspective [`quote`](LiquidityModule::quote) must be
//! a pure computation.  Side effects, if any, are the module's own: the
//! pool does not roll back module-internal state when a swap aborts.

use crate::domain::{Address, Amount, BasisPoints, LiquidityQuote, QuoteLevel, SwapDirection, Tick};
use crate::error::PoolError;

/// Everything a module needs to price the current round of a swap.
///
/// Constructed by the pool for each `quote` call.  The `context` slice is
/// the opaque, caller-supplied blob for this module, forwarded verbatim.
#[derive(Debug, Clone, Copy)]
pub struct QuoteRequest<'a> {
    direction: SwapDirection,
    amount_in_remaining: Amount,
    current_tick: Tick,
    limit_tick: Tick,
    fee_bips: BasisPoints,
    sender: Address,
    recipient: Address,
    context: &'a [u8],
}

impl<'a> QuoteRequest<'a> {
    /// Creates a quote request.
    ///
    /// Public so module implementations can build requests in their own
    /// tests; during a swap only the pool constructs these.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        direction: SwapDirection,
        amount_in_remaining: Amount,
        current_tick: Tick,
        limit_tick: Tick,
        fee_bips: BasisPoints,
        sender: Address,
        recipient: Address,
        context: &'a [u8],
    ) -> Self {
        Self {
            direction,
            amount_in_remaining,
            current_tick,
            limit_tick,
            fee_bips,
            sender,
            recipient,
            context,
        }
    }

    /// The swap direction.
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Net input still unfilled at the current tick.
    #[must_use]
    pub const fn amount_in_remaining(&self) -> Amount {
        self.amount_in_remaining
    }

    /// The tick at which the quote's first level will settle.
    #[must_use]
    pub const fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// The caller's limit tick; continuation levels may not pass it.
    #[must_use]
    pub const fn limit_tick(&self) -> Tick {
        self.limit_tick
    }

    /// The effective swap fee rate for this swap.
    #[must_use]
    pub const fn fee_bips(&self) -> BasisPoints {
        self.fee_bips
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

    /// Opaque caller-supplied context for this module.
    #[must_use]
    pub const fn context(&self) -> &'a [u8] {
        self.context
    }
}

/// Per-module outcome report delivered at the end of a swap.
///
/// Only sent to modules registered with the end-of-swap callback flag.
#[derive(Debug, Clone, Copy)]
pub struct SwapEndReport {
    direction: SwapDirection,
    amount_in_filled: Amount,
    amount_out_provided: Amount,
    fee_earned: Amount,
    reserves_after: (Amount, Amount),
    start_tick: Tick,
    end_tick: Tick,
    last_level: Option<QuoteLevel>,
}

impl SwapEndReport {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn new(
        direction: SwapDirection,
        amount_in_filled: Amount,
        amount_out_provided: Amount,
        fee_earned: Amount,
        reserves_after: (Amount, Amount),
        start_tick: Tick,
        end_tick: Tick,
        last_level: Option<QuoteLevel>,
    ) -> Self {
        Self {
            direction,
            amount_in_filled,
            amount_out_provided,
            fee_earned,
            reserves_after,
            start_tick,
            end_tick,
            last_level,
        }
    }

    /// The swap direction.
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Net input credited to this module across all rounds.
    #[must_use]
    pub const fn amount_in_filled(&self) -> Amount {
        self.amount_in_filled
    }

    /// Output this module provided across all rounds.
    #[must_use]
    pub const fn amount_out_provided(&self) -> Amount {
        self.amount_out_provided
    }

    /// Fee share earned by this module, after meta redistribution.
    #[must_use]
    pub const fn fee_earned(&self) -> Amount {
        self.fee_earned
    }

    /// The module's `(reserve0, reserve1)` after settlement.
    #[must_use]
    pub const fn reserves_after(&self) -> (Amount, Amount) {
        self.reserves_after
    }

    /// The tick at which the swap started.
    #[must_use]
    pub const fn start_tick(&self) -> Tick {
        self.start_tick
    }

    /// The tick at which the swap ended.
    #[must_use]
    pub const fn end_tick(&self) -> Tick {
        self.end_tick
    }

    /// The last quote level of this module the engine settled, if any.
    #[must_use]
    pub const fn last_level(&self) -> Option<QuoteLevel> {
        self.last_level
    }
}

/// Contract implemented by every algorithmic liquidity module.
///
/// The pool owns its modules as boxed trait objects: the module set is
/// open-ended by design, so enum dispatch over a closed set is not an
/// option here.
///
/// # Errors
///
/// [`quote`](Self::quote) may fail with any [`PoolError`]; the error
/// aborts the enclosing swap atomically.
pub trait LiquidityModule {
    /// The module's stable identity; must match the identity the module
    /// was registered under.
    fn identity(&self) -> Address;

    /// Produces this module's complete offer for the swap.
    ///
    /// Called exactly once per swap in which the module participates.
    /// The first level settles at `request.current_tick()`; continuation
    /// levels settle as the engine advances.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole swap with no state committed.
    fn quote(&mut self, request: &QuoteRequest<'_>) -> Result<LiquidityQuote, PoolError>;

    /// Optional just-in-time reserve top-up, consulted before `quote`
    /// for modules registered with the refresh flag.
    ///
    /// Returning `Some((amount0, amount1))` asks the pool to credit the
    /// module's reserves through the deposit path, which is why the
    /// deposit phase stays open during the quote rounds.
    fn refresh_reserves(
        &mut self,
        _direction: SwapDirection,
        _spot_tick: Tick,
    ) -> Option<(Amount, Amount)> {
        None
    }

    /// End-of-swap notification; delivered only to modules registered
    /// with the callback flag, after all locks except the swap lock have
    /// been released.
    fn on_swap_end(&mut self, _report: &SwapEndReport) {}

    /// Deposit notification, invoked by the pool for every deposit
    /// credited to this module (external or just-in-time).
    fn on_deposit(&mut self, _amount0: Amount, _amount1: Amount, _data: &[u8]) {}
}
