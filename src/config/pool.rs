//! Pool configuration.

use crate::domain::{Address, BasisPoints, Tick};
use crate::error::PoolError;

/// Default bound on continuation levels per quote.
///
/// The negotiation protocol imposes no inherent depth limit; bounding it
/// keeps per-swap memory proportional to the module count.  Observed
/// module implementations pre-compute at most three levels.
pub const DEFAULT_MAX_QUOTE_LEVELS: usize = 4;

/// Maximum swap fee rate: 100% in basis points.
pub const MAX_SWAP_FEE_BIPS: u32 = 10_000;

/// Immutable parameters of a [`UniversalPool`](crate::pool::UniversalPool).
///
/// # Validation
///
/// - The two token addresses must be distinct and non-zero.
/// - The manager address must be non-zero (it receives fee residuals).
/// - The default fee rate must not exceed 100% (10 000 basis points).
/// - `max_quote_levels` must be at least 1.
///
/// # Examples
///
/// ```
/// use medusa_amm::config::PoolConfig;
/// use medusa_amm::domain::{Address, BasisPoints, Tick};
///
/// let config = PoolConfig::new(
///     Address::from_bytes([1u8; 32]),
///     Address::from_bytes([2u8; 32]),
///     Address::from_bytes([3u8; 32]),
///     BasisPoints::new(30),
///     Tick::ZERO,
///     4,
/// );
/// assert!(config.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    token0: Address,
    token1: Address,
    manager: Address,
    default_fee_bips: BasisPoints,
    initial_spot_tick: Tick,
    max_quote_levels: usize,
}

impl PoolConfig {
    /// Creates a new `PoolConfig`.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfiguration`] if the token addresses are
    ///   equal, any required address is zero, or `max_quote_levels` is
    ///   zero.
    /// - [`PoolError::FeeRateTooHigh`] if the default fee exceeds
    ///   10 000 basis points.
    pub fn new(
        token0: Address,
        token1: Address,
        manager: Address,
        default_fee_bips: BasisPoints,
        initial_spot_tick: Tick,
        max_quote_levels: usize,
    ) -> crate::error::Result<Self> {
        let config = Self {
            token0,
            token1,
            manager,
            default_fee_bips,
            initial_spot_tick,
            max_quote_levels,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.token0.is_zero() || self.token1.is_zero() {
            return Err(PoolError::InvalidConfiguration(
                "token addresses must be non-zero",
            ));
        }
        if self.token0 == self.token1 {
            return Err(PoolError::InvalidConfiguration(
                "token addresses must be distinct",
            ));
        }
        if self.manager.is_zero() {
            return Err(PoolError::InvalidConfiguration(
                "manager address must be non-zero",
            ));
        }
        if self.default_fee_bips.get() > MAX_SWAP_FEE_BIPS {
            return Err(PoolError::FeeRateTooHigh);
        }
        if self.max_quote_levels == 0 {
            return Err(PoolError::InvalidConfiguration(
                "max_quote_levels must be at least 1",
            ));
        }
        Ok(())
    }

    /// The canonical token0 address.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// The canonical token1 address.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// The pool manager; receives fee-distribution residuals.
    #[must_use]
    pub const fn manager(&self) -> Address {
        self.manager
    }

    /// The fee rate used when no fee module is installed.
    #[must_use]
    pub const fn default_fee_bips(&self) -> BasisPoints {
        self.default_fee_bips
    }

    /// The spot tick the pool starts at.
    #[must_use]
    pub const fn initial_spot_tick(&self) -> Tick {
        self.initial_spot_tick
    }

    /// Maximum continuation levels accepted per quote.
    #[must_use]
    pub const fn max_quote_levels(&self) -> usize {
        self.max_quote_levels
    }
}
