//! Configuration for registering a liquidity module.

use crate::domain::{Address, BasisPoints};
use crate::error::PoolError;
use crate::registry::{AlmRole, MAX_META_FEE_SHARE_BIPS};

/// Declarative blueprint for one liquidity module registration.
///
/// Role and capability flags are fixed for the lifetime of the
/// registration; only the meta fee share can be changed later (via
/// [`AlmRegistry::set_meta_fee_share`](crate::registry::AlmRegistry::set_meta_fee_share)).
///
/// Construct through [`base`](Self::base) or [`meta`](Self::meta) — the
/// two constructors make the role/flag invariants unrepresentable:
///
/// - a `Base` module never carries a meta fee share;
/// - a `Meta` module never requests quote sharing (it is the one doing
///   the sharing).
///
/// # Examples
///
/// ```
/// use medusa_amm::config::AlmConfig;
/// use medusa_amm::domain::{Address, BasisPoints};
///
/// let base = AlmConfig::base(Address::from_bytes([1u8; 32]), false, true, false);
/// assert!(base.is_ok());
///
/// let meta = AlmConfig::meta(
///     Address::from_bytes([2u8; 32]),
///     true,
///     false,
///     BasisPoints::new(100),
/// );
/// assert!(meta.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlmConfig {
    module: Address,
    role: AlmRole,
    requires_callback: bool,
    shares_quotes: bool,
    refresh_reserves: bool,
    meta_fee_share: BasisPoints,
}

impl AlmConfig {
    /// Creates a configuration from explicit role and flags.
    ///
    /// Prefer [`base`](Self::base) / [`meta`](Self::meta); this general
    /// form exists for callers deserializing registrations from
    /// elsewhere, and it enforces every invariant the shorthand
    /// constructors make unrepresentable.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidIdentity`] if `module` is the zero address.
    /// - [`PoolError::InvalidFeeShare`] if a `Base` module carries a
    ///   nonzero `meta_fee_share`, or a `Meta` module requests quote
    ///   sharing.
    /// - [`PoolError::FeeShareTooHigh`] if `meta_fee_share` exceeds
    ///   5000 basis points.
    pub const fn new(
        module: Address,
        role: AlmRole,
        requires_callback: bool,
        shares_quotes: bool,
        refresh_reserves: bool,
        meta_fee_share: BasisPoints,
    ) -> crate::error::Result<Self> {
        if module.is_zero() {
            return Err(PoolError::InvalidIdentity("module address must be non-zero"));
        }
        if role.is_base() && meta_fee_share.get() != 0 {
            return Err(PoolError::InvalidFeeShare(
                "base modules cannot carry a meta fee share",
            ));
        }
        if role.is_meta() && shares_quotes {
            return Err(PoolError::InvalidFeeShare(
                "meta modules cannot request quote sharing",
            ));
        }
        if meta_fee_share.get() > MAX_META_FEE_SHARE_BIPS {
            return Err(PoolError::FeeShareTooHigh);
        }
        Ok(Self {
            module,
            role,
            requires_callback,
            shares_quotes,
            refresh_reserves,
            meta_fee_share,
        })
    }

    /// Creates the configuration for a `Base` module.
    ///
    /// # Arguments
    ///
    /// - `requires_callback` — deliver the end-of-swap callback.
    /// - `shares_quotes` — opt into receiving redistributed meta fees.
    /// - `refresh_reserves` — ask for a reserve refresh before quoting.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidIdentity`] if `module` is the zero
    /// address.
    pub const fn base(
        module: Address,
        requires_callback: bool,
        shares_quotes: bool,
        refresh_reserves: bool,
    ) -> crate::error::Result<Self> {
        Self::new(
            module,
            AlmRole::Base,
            requires_callback,
            shares_quotes,
            refresh_reserves,
            BasisPoints::ZERO,
        )
    }

    /// Creates the configuration for a `Meta` module.
    ///
    /// # Arguments
    ///
    /// - `meta_fee_share` — the portion of this module's earned fee
    ///   redistributed to quote-sharing base modules, capped at 50%.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidIdentity`] if `module` is the zero address.
    /// - [`PoolError::FeeShareTooHigh`] if `meta_fee_share` exceeds
    ///   5000 basis points.
    pub const fn meta(
        module: Address,
        requires_callback: bool,
        refresh_reserves: bool,
        meta_fee_share: BasisPoints,
    ) -> crate::error::Result<Self> {
        Self::new(
            module,
            AlmRole::Meta,
            requires_callback,
            false,
            refresh_reserves,
            meta_fee_share,
        )
    }

    /// The module's stable identity.
    #[must_use]
    pub const fn module(&self) -> Address {
        self.module
    }

    /// The module's role.
    #[must_use]
    pub const fn role(&self) -> AlmRole {
        self.role
    }

    /// Whether the module receives the end-of-swap callback.
    #[must_use]
    pub const fn requires_callback(&self) -> bool {
        self.requires_callback
    }

    /// Whether this base module opted into redistributed meta fees.
    #[must_use]
    pub const fn shares_quotes(&self) -> bool {
        self.shares_quotes
    }

    /// Whether the module wants a reserve refresh before quoting.
    #[must_use]
    pub const fn refresh_reserves(&self) -> bool {
        self.refresh_reserves
    }

    /// The meta fee share; zero for base modules.
    #[must_use]
    pub const fn meta_fee_share(&self) -> BasisPoints {
        self.meta_fee_share
    }
}
