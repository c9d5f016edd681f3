//! Outcome of a completed swap.

use core::fmt;

use crate::domain::{Address, Amount, Tick};

/// One module's final settlement totals for a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlmSettlement {
    module: Address,
    amount_in_filled: Amount,
    amount_out_provided: Amount,
    fee_share: Amount,
}

impl AlmSettlement {
    pub(crate) const fn new(
        module: Address,
        amount_in_filled: Amount,
        amount_out_provided: Amount,
        fee_share: Amount,
    ) -> Self {
        Self {
            module,
            amount_in_filled,
            amount_out_provided,
            fee_share,
        }
    }

    /// The settled module's identity.
    #[must_use]
    pub const fn module(&self) -> Address {
        self.module
    }

    /// Net input credited to the module across all rounds.
    #[must_use]
    pub const fn amount_in_filled(&self) -> Amount {
        self.amount_in_filled
    }

    /// Output the module provided across all rounds.
    #[must_use]
    pub const fn amount_out_provided(&self) -> Amount {
        self.amount_out_provided
    }

    /// The module's fee share after meta redistribution.
    #[must_use]
    pub const fn fee_share(&self) -> Amount {
        self.fee_share
    }
}

/// The outcome of a completed swap: the headline amounts plus the
/// per-module settlement breakdown.
///
/// # Invariants
///
/// - `amount_in_used <= amount_in` requested; partial fills terminate at
///   the limit tick or when no module offers further movement.
/// - The settlement outputs sum to `amount_out`.
/// - The settlement fee shares plus `manager_fee_residual` sum to
///   `effective_fee` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSummary {
    amount_in_used: Amount,
    amount_out: Amount,
    effective_fee: Amount,
    start_tick: Tick,
    end_tick: Tick,
    manager_fee_residual: Amount,
    settlements: Vec<AlmSettlement>,
}

impl SwapSummary {
    pub(crate) const fn new(
        amount_in_used: Amount,
        amount_out: Amount,
        effective_fee: Amount,
        start_tick: Tick,
        end_tick: Tick,
        manager_fee_residual: Amount,
        settlements: Vec<AlmSettlement>,
    ) -> Self {
        Self {
            amount_in_used,
            amount_out,
            effective_fee,
            start_tick,
            end_tick,
            manager_fee_residual,
            settlements,
        }
    }

    /// Gross input consumed, effective fee included.
    #[must_use]
    pub const fn amount_in_used(&self) -> Amount {
        self.amount_in_used
    }

    /// Total output delivered to the recipient.
    #[must_use]
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// The fee actually charged, scaled to the filled portion.
    #[must_use]
    pub const fn effective_fee(&self) -> Amount {
        self.effective_fee
    }

    /// The tick at which the swap started.
    #[must_use]
    pub const fn start_tick(&self) -> Tick {
        self.start_tick
    }

    /// The tick at which the swap settled; becomes the new spot tick.
    #[must_use]
    pub const fn end_tick(&self) -> Tick {
        self.end_tick
    }

    /// Rounding residual of the fee distribution, retained by the pool
    /// manager.
    #[must_use]
    pub const fn manager_fee_residual(&self) -> Amount {
        self.manager_fee_residual
    }

    /// Per-module settlement totals, in quoting order.
    #[must_use]
    pub fn settlements(&self) -> &[AlmSettlement] {
        &self.settlements
    }
}

impl fmt::Display for SwapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapSummary(in={}, out={}, fee={}, ticks {}..{})",
            self.amount_in_used, self.amount_out, self.effective_fee, self.start_tick, self.end_tick
        )
    }
}
