//! Ordered, indexable collection of liquidity module records.

use std::collections::BTreeMap;

use super::{AlmPosition, AlmRole, AlmStatus, MAX_META_FEE_SHARE_BIPS};
use crate::config::AlmConfig;
use crate::domain::{Address, Amount, BasisPoints, SwapDirection};
use crate::error::PoolError;

/// The pool's registry of liquidity modules.
///
/// Storage is a dense array of active positions plus an identity→index
/// side-map; removal compacts the array while preserving the relative
/// order of the survivors.  Removed positions move to a tombstone map:
/// they stay queryable and their identities can never be reused.
///
/// # Ordering Invariant
///
/// All `Base` positions occupy lower indices than all `Meta` positions.
/// Index assignment is append-only, so a `Base` registration is rejected
/// once any `Meta` module is present — it would have to land after a
/// `Meta` entry.  Removal compacts without reordering, so the base
/// prefix survives every add/remove interleaving.
#[derive(Debug, Default)]
pub struct AlmRegistry {
    entries: Vec<AlmPosition>,
    index: BTreeMap<Address, usize>,
    retired: BTreeMap<Address, AlmPosition>,
    base_count: usize,
}

impl AlmRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new module and assigns it the next free index.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidIdentity`] if the identity is zero
    ///   (unreachable through [`AlmConfig`], guarded for safety).
    /// - [`PoolError::AlreadyExists`] if the identity is active **or was
    ///   ever removed** — identities are never reusable.
    /// - [`PoolError::RoleOrderingViolation`] if a `Base` module is
    ///   registered while a `Meta` module is present.
    pub fn add(&mut self, config: &AlmConfig) -> crate::error::Result<usize> {
        let module = config.module();
        if module.is_zero() {
            return Err(PoolError::InvalidIdentity("module address must be non-zero"));
        }
        if self.index.contains_key(&module) || self.retired.contains_key(&module) {
            return Err(PoolError::AlreadyExists);
        }
        if config.role().is_base() && self.entries.len() > self.base_count {
            return Err(PoolError::RoleOrderingViolation);
        }

        let idx = self.entries.len();
        self.entries.push(AlmPosition::from_config(config));
        self.index.insert(module, idx);
        if config.role().is_base() {
            self.base_count += 1;
        }
        Ok(idx)
    }

    /// Removes a module: marks it `Removed`, compacts the dense order,
    /// and retires the record into the tombstone map.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NotFound`] if the identity is absent or
    /// already removed.
    pub fn remove(&mut self, module: Address) -> crate::error::Result<()> {
        let idx = *self.index.get(&module).ok_or(PoolError::NotFound)?;
        let mut position = self.entries.remove(idx);
        self.index.remove(&module);
        // Compact: every survivor after the hole shifts down by one.
        for entry in self.entries.iter().skip(idx) {
            if let Some(slot) = self.index.get_mut(&entry.module()) {
                *slot -= 1;
            }
        }
        if position.role().is_base() {
            self.base_count -= 1;
        }
        position.retire();
        self.retired.insert(module, position);
        Ok(())
    }

    /// Looks up a position by identity, active or removed.
    #[must_use]
    pub fn get(&self, module: Address) -> Option<(AlmStatus, &AlmPosition)> {
        if let Some(&idx) = self.index.get(&module) {
            return self.entries.get(idx).map(|p| (AlmStatus::Active, p));
        }
        self.retired.get(&module).map(|p| (AlmStatus::Removed, p))
    }

    /// Returns the active position at the given dense index.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NotFound`] if the index is out of bounds.
    pub fn get_by_index(&self, index: usize) -> crate::error::Result<&AlmPosition> {
        self.entries.get(index).ok_or(PoolError::NotFound)
    }

    /// Number of active positions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of active `Base` positions; these occupy indices
    /// `0..active_base_count()`.
    #[must_use]
    pub fn active_base_count(&self) -> usize {
        self.base_count
    }

    /// Returns `true` if the identity is registered and not removed.
    #[must_use]
    pub fn is_active(&self, module: Address) -> bool {
        self.index.contains_key(&module)
    }

    /// Iterates the active positions in dense-index order.
    pub fn iter(&self) -> impl Iterator<Item = &AlmPosition> {
        self.entries.iter()
    }

    /// Updates a meta module's fee share.
    ///
    /// # Errors
    ///
    /// - [`PoolError::NotFound`] if the identity is absent or removed.
    /// - [`PoolError::NotMeta`] if the target is a `Base` module.
    /// - [`PoolError::FeeShareTooHigh`] above 5000 basis points.
    pub fn set_meta_fee_share(
        &mut self,
        module: Address,
        bips: BasisPoints,
    ) -> crate::error::Result<()> {
        if bips.get() > MAX_META_FEE_SHARE_BIPS {
            return Err(PoolError::FeeShareTooHigh);
        }
        let position = self.position_mut(module)?;
        if position.role() != AlmRole::Meta {
            return Err(PoolError::NotMeta);
        }
        position.set_meta_fee_share(bips);
        Ok(())
    }

    /// Applies one module's swap settlement.  Callable only from the
    /// pool's commit step, while the swap lock is held.
    pub(crate) fn settle_swap(
        &mut self,
        module: Address,
        direction: SwapDirection,
        input_credit: Amount,
        output_debit: Amount,
        fee_credit: Amount,
    ) -> crate::error::Result<()> {
        self.position_mut(module)?
            .apply_settlement(direction, input_credit, output_debit, fee_credit)
    }

    /// Credits a deposit to a module's reserves.  Callable only from the
    /// pool's lock-guarded deposit path.
    pub(crate) fn credit_deposit(
        &mut self,
        module: Address,
        amount0: Amount,
        amount1: Amount,
    ) -> crate::error::Result<()> {
        self.position_mut(module)?.credit(amount0, amount1)
    }

    /// Debits a withdrawal from a module's reserves.  Callable only from
    /// the pool's lock-guarded withdrawal path.
    pub(crate) fn debit_withdraw(
        &mut self,
        module: Address,
        amount0: Amount,
        amount1: Amount,
    ) -> crate::error::Result<()> {
        self.position_mut(module)?.debit(amount0, amount1)
    }

    /// Commits one swap's staged work in a single all-or-nothing pass:
    /// just-in-time refresh credits first, then every module settlement.
    ///
    /// All updates are applied to cloned positions and written back only
    /// once the whole batch has succeeded, so a failure anywhere leaves
    /// the registry untouched.
    pub(crate) fn apply_swap_commit(
        &mut self,
        direction: SwapDirection,
        refreshes: &[(Address, Amount, Amount)],
        settlements: &[(Address, Amount, Amount, Amount)],
    ) -> crate::error::Result<()> {
        let mut staged: BTreeMap<Address, AlmPosition> = BTreeMap::new();

        for &(module, amount0, amount1) in refreshes {
            self.stage(&mut staged, module)?.credit(amount0, amount1)?;
        }
        for &(module, input_credit, output_debit, fee_credit) in settlements {
            self.stage(&mut staged, module)?.apply_settlement(
                direction,
                input_credit,
                output_debit,
                fee_credit,
            )?;
        }

        for (module, position) in staged {
            let idx = *self.index.get(&module).ok_or(PoolError::NotFound)?;
            let slot = self.entries.get_mut(idx).ok_or(PoolError::NotFound)?;
            *slot = position;
        }
        Ok(())
    }

    /// Fetches (cloning on first touch) a module's working copy for the
    /// commit batch.
    fn stage<'a>(
        &self,
        staged: &'a mut BTreeMap<Address, AlmPosition>,
        module: Address,
    ) -> crate::error::Result<&'a mut AlmPosition> {
        if !staged.contains_key(&module) {
            let idx = *self.index.get(&module).ok_or(PoolError::NotFound)?;
            let current = self.entries.get(idx).ok_or(PoolError::NotFound)?.clone();
            staged.insert(module, current);
        }
        staged.get_mut(&module).ok_or(PoolError::NotFound)
    }

    fn position_mut(&mut self, module: Address) -> crate::error::Result<&mut AlmPosition> {
        let idx = *self.index.get(&module).ok_or(PoolError::NotFound)?;
        self.entries.get_mut(idx).ok_or(PoolError::NotFound)
    }
}
