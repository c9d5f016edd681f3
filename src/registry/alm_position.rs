//! Per-module participation record held by the registry.

use core::fmt;

use crate::config::AlmConfig;
use crate::domain::{Address, Amount, BasisPoints, SwapDirection};
use crate::error::PoolError;

/// Maximum meta fee share: 50% in basis points.
pub const MAX_META_FEE_SHARE_BIPS: u32 = 5_000;

/// The role a liquidity module plays in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlmRole {
    /// Quotes directly against the pool.
    Base,
    /// Aggregates quotes sourced from base modules and may share a
    /// portion of its earned fee back to them.
    Meta,
}

impl AlmRole {
    /// Returns `true` for [`AlmRole::Base`].
    #[must_use]
    pub const fn is_base(&self) -> bool {
        matches!(self, Self::Base)
    }

    /// Returns `true` for [`AlmRole::Meta`].
    #[must_use]
    pub const fn is_meta(&self) -> bool {
        matches!(self, Self::Meta)
    }
}

impl fmt::Display for AlmRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "Base"),
            Self::Meta => write!(f, "Meta"),
        }
    }
}

/// Lifecycle status of a registry entry.
///
/// The only transition is `Active -> Removed`, one-way.  A removed
/// identity can never be re-added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlmStatus {
    /// Participating in swaps.
    Active,
    /// Retired; reserves and fee counters remain queryable.
    Removed,
}

/// One module's participation record: identity, role, capability flags,
/// fee share, canonically-oriented reserves, and cumulative fee
/// counters.
///
/// Role and capability flags are fixed at creation; only the meta fee
/// share is mutable afterwards (and only while the role is `Meta`).
/// Reserves and fee counters are mutated exclusively through the
/// registry's settlement and deposit/withdraw entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlmPosition {
    module: Address,
    role: AlmRole,
    requires_callback: bool,
    shares_quotes: bool,
    refresh_reserves: bool,
    meta_fee_share: BasisPoints,
    reserve0: Amount,
    reserve1: Amount,
    fees0: Amount,
    fees1: Amount,
    status: AlmStatus,
}

impl AlmPosition {
    /// Creates an active position from a validated [`AlmConfig`], with
    /// zero reserves and fee counters.
    #[must_use]
    pub(crate) fn from_config(config: &AlmConfig) -> Self {
        Self {
            module: config.module(),
            role: config.role(),
            requires_callback: config.requires_callback(),
            shares_quotes: config.shares_quotes(),
            refresh_reserves: config.refresh_reserves(),
            meta_fee_share: config.meta_fee_share(),
            reserve0: Amount::ZERO,
            reserve1: Amount::ZERO,
            fees0: Amount::ZERO,
            fees1: Amount::ZERO,
            status: AlmStatus::Active,
        }
    }

    /// The module's stable identity.
    #[must_use]
    pub const fn module(&self) -> Address {
        self.module
    }

    /// The module's role, fixed at creation.
    #[must_use]
    pub const fn role(&self) -> AlmRole {
        self.role
    }

    /// Whether the module receives the end-of-swap callback.
    #[must_use]
    pub const fn requires_callback(&self) -> bool {
        self.requires_callback
    }

    /// Whether this base module opted into receiving redistributed meta
    /// fees.
    #[must_use]
    pub const fn shares_quotes(&self) -> bool {
        self.shares_quotes
    }

    /// Whether the module wants a reserve refresh before quoting.
    #[must_use]
    pub const fn refresh_reserves(&self) -> bool {
        self.refresh_reserves
    }

    /// The meta fee share in basis points; always zero for base modules.
    #[must_use]
    pub const fn meta_fee_share(&self) -> BasisPoints {
        self.meta_fee_share
    }

    /// The module's token0 reserve.
    #[must_use]
    pub const fn reserve0(&self) -> Amount {
        self.reserve0
    }

    /// The module's token1 reserve.
    #[must_use]
    pub const fn reserve1(&self) -> Amount {
        self.reserve1
    }

    /// Cumulative fees earned in token0.
    #[must_use]
    pub const fn fees0(&self) -> Amount {
        self.fees0
    }

    /// Cumulative fees earned in token1.
    #[must_use]
    pub const fn fees1(&self) -> Amount {
        self.fees1
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AlmStatus {
        self.status
    }

    /// Returns `true` while the position participates in swaps.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, AlmStatus::Active)
    }

    /// The reserve of the output token for the given swap direction.
    #[must_use]
    pub const fn output_reserve(&self, direction: SwapDirection) -> Amount {
        match direction {
            SwapDirection::ZeroForOne => self.reserve1,
            SwapDirection::OneForZero => self.reserve0,
        }
    }

    pub(crate) fn set_meta_fee_share(&mut self, bips: BasisPoints) {
        self.meta_fee_share = bips;
    }

    pub(crate) fn retire(&mut self) {
        self.status = AlmStatus::Removed;
    }

    /// Credits a deposit to both reserves.
    pub(crate) fn credit(&mut self, amount0: Amount, amount1: Amount) -> crate::error::Result<()> {
        self.reserve0 = self
            .reserve0
            .checked_add(&amount0)
            .ok_or(PoolError::Overflow("reserve0 credit overflow"))?;
        self.reserve1 = self
            .reserve1
            .checked_add(&amount1)
            .ok_or(PoolError::Overflow("reserve1 credit overflow"))?;
        Ok(())
    }

    /// Debits a withdrawal from both reserves.
    pub(crate) fn debit(&mut self, amount0: Amount, amount1: Amount) -> crate::error::Result<()> {
        let new0 = self
            .reserve0
            .checked_sub(&amount0)
            .ok_or(PoolError::InsufficientReserves("token0 reserve too low"))?;
        let new1 = self
            .reserve1
            .checked_sub(&amount1)
            .ok_or(PoolError::InsufficientReserves("token1 reserve too low"))?;
        self.reserve0 = new0;
        self.reserve1 = new1;
        Ok(())
    }

    /// Applies one swap settlement: the input-side reserve grows by the
    /// tick-implied input credit plus the fee share, the output-side
    /// reserve shrinks by the output provided, and the input-side fee
    /// counter tracks the fee share.
    pub(crate) fn apply_settlement(
        &mut self,
        direction: SwapDirection,
        input_credit: Amount,
        output_debit: Amount,
        fee_credit: Amount,
    ) -> crate::error::Result<()> {
        let gross_in = input_credit
            .checked_add(&fee_credit)
            .ok_or(PoolError::Overflow("settlement input overflow"))?;
        // Compute every new value before assigning any, so a failed
        // settlement leaves the position untouched.
        match direction {
            SwapDirection::ZeroForOne => {
                let new0 = self
                    .reserve0
                    .checked_add(&gross_in)
                    .ok_or(PoolError::Overflow("reserve0 settlement overflow"))?;
                let new1 = self
                    .reserve1
                    .checked_sub(&output_debit)
                    .ok_or(PoolError::InsufficientReserves("token1 reserve too low"))?;
                let new_fees = self
                    .fees0
                    .checked_add(&fee_credit)
                    .ok_or(PoolError::Overflow("fees0 overflow"))?;
                self.reserve0 = new0;
                self.reserve1 = new1;
                self.fees0 = new_fees;
            }
            SwapDirection::OneForZero => {
                let new1 = self
                    .reserve1
                    .checked_add(&gross_in)
                    .ok_or(PoolError::Overflow("reserve1 settlement overflow"))?;
                let new0 = self
                    .reserve0
                    .checked_sub(&output_debit)
                    .ok_or(PoolError::InsufficientReserves("token0 reserve too low"))?;
                let new_fees = self
                    .fees1
                    .checked_add(&fee_credit)
                    .ok_or(PoolError::Overflow("fees1 overflow"))?;
                self.reserve1 = new1;
                self.reserve0 = new0;
                self.fees1 = new_fees;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::from_bytes([tag; 32])
    }

    fn base_position() -> AlmPosition {
        let Ok(cfg) = AlmConfig::base(addr(1), false, false, false) else {
            panic!("valid config");
        };
        AlmPosition::from_config(&cfg)
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn from_config_starts_active_and_empty() {
        let pos = base_position();
        assert!(pos.is_active());
        assert_eq!(pos.reserve0(), Amount::ZERO);
        assert_eq!(pos.reserve1(), Amount::ZERO);
        assert_eq!(pos.fees0(), Amount::ZERO);
        assert_eq!(pos.fees1(), Amount::ZERO);
        assert_eq!(pos.meta_fee_share(), BasisPoints::ZERO);
    }

    #[test]
    fn meta_config_carries_share() {
        let Ok(cfg) = AlmConfig::meta(addr(2), true, false, BasisPoints::new(100)) else {
            panic!("valid config");
        };
        let pos = AlmPosition::from_config(&cfg);
        assert!(pos.role().is_meta());
        assert!(pos.requires_callback());
        assert_eq!(pos.meta_fee_share(), BasisPoints::new(100));
    }

    // -- Reserves -----------------------------------------------------------

    #[test]
    fn credit_and_debit_round_trip() {
        let mut pos = base_position();
        let Ok(()) = pos.credit(Amount::new(100), Amount::new(200)) else {
            panic!("expected Ok");
        };
        assert_eq!(pos.reserve0(), Amount::new(100));
        assert_eq!(pos.reserve1(), Amount::new(200));
        let Ok(()) = pos.debit(Amount::new(100), Amount::new(200)) else {
            panic!("expected Ok");
        };
        assert_eq!(pos.reserve0(), Amount::ZERO);
        assert_eq!(pos.reserve1(), Amount::ZERO);
    }

    #[test]
    fn debit_beyond_reserve_rejected_atomically() {
        let mut pos = base_position();
        let Ok(()) = pos.credit(Amount::new(10), Amount::new(10)) else {
            panic!("expected Ok");
        };
        // token1 debit fails; token0 must stay untouched.
        let result = pos.debit(Amount::new(5), Amount::new(11));
        assert!(matches!(result, Err(PoolError::InsufficientReserves(_))));
        assert_eq!(pos.reserve0(), Amount::new(10));
        assert_eq!(pos.reserve1(), Amount::new(10));
    }

    #[test]
    fn output_reserve_follows_direction() {
        let mut pos = base_position();
        let Ok(()) = pos.credit(Amount::new(7), Amount::new(9)) else {
            panic!("expected Ok");
        };
        assert_eq!(pos.output_reserve(SwapDirection::ZeroForOne), Amount::new(9));
        assert_eq!(pos.output_reserve(SwapDirection::OneForZero), Amount::new(7));
    }

    // -- Settlement -----------------------------------------------------------

    #[test]
    fn settlement_zero_for_one() {
        let mut pos = base_position();
        let Ok(()) = pos.credit(Amount::new(0), Amount::new(1_000)) else {
            panic!("expected Ok");
        };
        let Ok(()) = pos.apply_settlement(
            SwapDirection::ZeroForOne,
            Amount::new(100),
            Amount::new(99),
            Amount::new(3),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(pos.reserve0(), Amount::new(103));
        assert_eq!(pos.reserve1(), Amount::new(901));
        assert_eq!(pos.fees0(), Amount::new(3));
        assert_eq!(pos.fees1(), Amount::ZERO);
    }

    #[test]
    fn settlement_one_for_zero() {
        let mut pos = base_position();
        let Ok(()) = pos.credit(Amount::new(1_000), Amount::ZERO) else {
            panic!("expected Ok");
        };
        let Ok(()) = pos.apply_settlement(
            SwapDirection::OneForZero,
            Amount::new(50),
            Amount::new(49),
            Amount::new(1),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(pos.reserve1(), Amount::new(51));
        assert_eq!(pos.reserve0(), Amount::new(951));
        assert_eq!(pos.fees1(), Amount::new(1));
    }

    #[test]
    fn settlement_beyond_reserve_rejected() {
        let mut pos = base_position();
        let result = pos.apply_settlement(
            SwapDirection::ZeroForOne,
            Amount::new(10),
            Amount::new(1),
            Amount::ZERO,
        );
        assert!(matches!(result, Err(PoolError::InsufficientReserves(_))));
        // Nothing committed.
        assert_eq!(pos.reserve0(), Amount::ZERO);
        assert_eq!(pos.fees0(), Amount::ZERO);
    }

    // -- Lifecycle ------------------------------------------------------------

    #[test]
    fn retire_is_terminal() {
        let mut pos = base_position();
        pos.retire();
        assert_eq!(pos.status(), AlmStatus::Removed);
        assert!(!pos.is_active());
    }

    // -- Role display ----------------------------------------------------------

    #[test]
    fn role_display_and_predicates() {
        assert_eq!(format!("{}", AlmRole::Base), "Base");
        assert_eq!(format!("{}", AlmRole::Meta), "Meta");
        assert!(AlmRole::Base.is_base());
        assert!(AlmRole::Meta.is_meta());
    }
}
