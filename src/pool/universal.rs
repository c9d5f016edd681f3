//! The pool coordinator.
//!
//! [`UniversalPool`] owns the module registry, the module objects, the
//! optional fee and oracle collaborators, the phase locks, and the
//! pool-level fee accumulators.  It validates external requests, drives
//! the swap orchestrator, commits settlement atomically, and fans out
//! the end-of-swap callbacks.
//!
//! # Swap Lifecycle
//!
//! 1. Lock *swap* and *withdrawal* (*deposit* stays open for
//!    just-in-time liquidity).
//! 2. Validate parameters; price the fee via the fee module or the
//!    configured default.
//! 3. Run the just-in-time reserve refresh pass, then the orchestrator's
//!    quote rounds — all accounting staged in the ephemeral swap state.
//! 4. Finalize fees; lock *deposit*; commit refreshes and settlements to
//!    the registry in one all-or-nothing batch; move the spot tick.
//! 5. Unlock *deposit* and *withdrawal*; deliver module/fee/oracle
//!    callbacks; unlock *swap* last.
//!
//! Any error restores the lock snapshot and leaves the registry exactly
//! as it was: the staged state is simply dropped.

use std::collections::BTreeMap;

use super::locks::{Phase, PhaseLocks};
use crate::config::{AlmConfig, PoolConfig, MAX_SWAP_FEE_BIPS};
use crate::domain::{Address, Amount, BasisPoints, Price, Rounding, SwapDirection, Tick};
use crate::error::PoolError;
use crate::math::price_at_tick;
use crate::registry::AlmRegistry;
use crate::swap::orchestrator::{self, QuoteInputs};
use crate::swap::state::{ModuleSlot, SwapState};
use crate::swap::{AlmSettlement, SwapParams, SwapSummary};
use crate::traits::{LiquidityModule, OracleModule, SwapEndReport, SwapFeeModule};

/// Basis-point denominator used in the fee-exclusive input derivation.
const BPS_DENOMINATOR: u128 = 10_000;

/// A two-token liquidity pool whose reserves and pricing live entirely
/// in pluggable liquidity modules.
///
/// The pool itself performs no price discovery: it aggregates module
/// quotes through the tick-based negotiation protocol, enforces the
/// per-quote and per-round invariants, and keeps the books.
pub struct UniversalPool {
    config: PoolConfig,
    registry: AlmRegistry,
    modules: BTreeMap<Address, Box<dyn LiquidityModule>>,
    fee_module: Option<Box<dyn SwapFeeModule>>,
    oracle: Option<Box<dyn OracleModule>>,
    locks: PhaseLocks,
    spot_tick: Tick,
    manager_fees0: Amount,
    manager_fees1: Amount,
}

impl UniversalPool {
    /// Creates a pool from a validated configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolConfig::validate`] failures.
    pub fn new(config: PoolConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            spot_tick: config.initial_spot_tick(),
            config,
            registry: AlmRegistry::new(),
            modules: BTreeMap::new(),
            fee_module: None,
            oracle: None,
            locks: PhaseLocks::new(),
            manager_fees0: Amount::ZERO,
            manager_fees1: Amount::ZERO,
        })
    }

    /// Installs (or replaces) the swap-fee module.
    pub fn install_fee_module(&mut self, module: Box<dyn SwapFeeModule>) {
        self.fee_module = Some(module);
    }

    /// Installs (or replaces) the oracle module.
    pub fn install_oracle(&mut self, oracle: Box<dyn OracleModule>) {
        self.oracle = Some(oracle);
    }

    /// Registers a liquidity module and takes ownership of its object.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidIdentity`] if the object's
    ///   [`identity`](LiquidityModule::identity) does not match the
    ///   configuration.
    /// - All [`AlmRegistry::add`] errors.
    pub fn add_module(
        &mut self,
        config: &AlmConfig,
        module: Box<dyn LiquidityModule>,
    ) -> crate::error::Result<usize> {
        if module.identity() != config.module() {
            return Err(PoolError::InvalidIdentity(
                "module object identity does not match its configuration",
            ));
        }
        let index = self.registry.add(config)?;
        self.modules.insert(config.module(), module);
        Ok(index)
    }

    /// Removes a module from participation.  Its registry record remains
    /// queryable; the identity can never be re-added.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NotFound`] if the identity is absent or
    /// already removed.
    pub fn remove_module(&mut self, module: Address) -> crate::error::Result<()> {
        self.registry.remove(module)?;
        self.modules.remove(&module);
        Ok(())
    }

    /// Updates a meta module's fee share.
    ///
    /// # Errors
    ///
    /// Propagates [`AlmRegistry::set_meta_fee_share`] failures.
    pub fn set_meta_fee_share(
        &mut self,
        module: Address,
        bips: BasisPoints,
    ) -> crate::error::Result<()> {
        self.registry.set_meta_fee_share(module, bips)
    }

    /// Credits liquidity to a module's reserves.
    ///
    /// Guarded by the *deposit* phase lock; the module's
    /// [`on_deposit`](LiquidityModule::on_deposit) callback runs while
    /// the lock is held.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Locked`] if the deposit phase is locked.
    /// - [`PoolError::ZeroAmount`] if both amounts are zero.
    /// - [`PoolError::NotFound`] if the module is absent or removed.
    pub fn deposit(
        &mut self,
        module: Address,
        amount0: Amount,
        amount1: Amount,
        data: &[u8],
    ) -> crate::error::Result<()> {
        let snapshot = self.locks.snapshot();
        self.locks.enter(Phase::Deposit)?;
        let result = self.deposit_locked(module, amount0, amount1, data);
        match result {
            Ok(()) => {
                self.locks.exit(Phase::Deposit);
                Ok(())
            }
            Err(e) => {
                self.locks.restore(snapshot);
                Err(e)
            }
        }
    }

    fn deposit_locked(
        &mut self,
        module: Address,
        amount0: Amount,
        amount1: Amount,
        data: &[u8],
    ) -> crate::error::Result<()> {
        if amount0.is_zero() && amount1.is_zero() {
            return Err(PoolError::ZeroAmount("deposit amounts are both zero"));
        }
        self.registry.credit_deposit(module, amount0, amount1)?;
        if let Some(object) = self.modules.get_mut(&module) {
            object.on_deposit(amount0, amount1, data);
        }
        Ok(())
    }

    /// Debits liquidity from a module's reserves.
    ///
    /// Guarded by the *withdrawal* phase lock; barred for the whole
    /// duration of a swap because reserves are being recomputed.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Locked`] if the withdrawal phase is locked.
    /// - [`PoolError::ZeroAmount`] if both amounts are zero.
    /// - [`PoolError::InvalidRecipient`] if `recipient` is zero.
    /// - [`PoolError::NotFound`] if the module is absent or removed.
    /// - [`PoolError::InsufficientReserves`] if either reserve is too
    ///   low.
    pub fn withdraw(
        &mut self,
        module: Address,
        amount0: Amount,
        amount1: Amount,
        recipient: Address,
    ) -> crate::error::Result<()> {
        let snapshot = self.locks.snapshot();
        self.locks.enter(Phase::Withdrawal)?;
        let result = self.withdraw_locked(module, amount0, amount1, recipient);
        match result {
            Ok(()) => {
                self.locks.exit(Phase::Withdrawal);
                Ok(())
            }
            Err(e) => {
                self.locks.restore(snapshot);
                Err(e)
            }
        }
    }

    fn withdraw_locked(
        &mut self,
        module: Address,
        amount0: Amount,
        amount1: Amount,
        recipient: Address,
    ) -> crate::error::Result<()> {
        if amount0.is_zero() && amount1.is_zero() {
            return Err(PoolError::ZeroAmount("withdrawal amounts are both zero"));
        }
        if recipient.is_zero() {
            return Err(PoolError::InvalidRecipient("recipient must be non-zero"));
        }
        self.registry.debit_withdraw(module, amount0, amount1)
    }

    /// Executes a swap.
    ///
    /// `now` is the caller's current timestamp, compared against the
    /// request deadline; the pool keeps no clock of its own.
    ///
    /// # Errors
    ///
    /// Every validation, quote, and outcome error listed in
    /// [`PoolError`]; any error leaves pool state untouched.
    pub fn swap(
        &mut self,
        params: &SwapParams,
        now: u64,
    ) -> crate::error::Result<SwapSummary> {
        let snapshot = self.locks.snapshot();
        self.locks.enter(Phase::Swap)?;
        if let Err(e) = self.locks.enter(Phase::Withdrawal) {
            self.locks.restore(snapshot);
            return Err(e);
        }

        match self.swap_locked(params, now) {
            Ok(summary) => {
                // Deposit and withdrawal reopened inside; swap last.
                self.locks.exit(Phase::Swap);
                Ok(summary)
            }
            Err(e) => {
                self.locks.restore(snapshot);
                Err(e)
            }
        }
    }

    fn swap_locked(
        &mut self,
        params: &SwapParams,
        now: u64,
    ) -> crate::error::Result<SwapSummary> {
        self.validate_swap_params(params, now)?;

        let direction = params.direction();
        let start_tick = self.spot_tick;

        // Fee rate: fee module if installed, constant default otherwise.
        let (fee_bips, fee_payload) = match self.fee_module.as_mut() {
            Some(module) => {
                let quote = module.fee_in_bips(
                    direction,
                    params.amount_in(),
                    params.sender(),
                    params.fee_context(),
                )?;
                (quote.bips(), quote.payload().to_vec())
            }
            None => (self.config.default_fee_bips(), Vec::new()),
        };
        if fee_bips.get() > MAX_SWAP_FEE_BIPS {
            return Err(PoolError::FeeRateTooHigh);
        }

        // amount_in_minus_fee = amount_in * 10_000 / (10_000 + fee_bips)
        let net_input = params
            .amount_in()
            .mul_div(
                Amount::new(BPS_DENOMINATOR),
                Amount::new(BPS_DENOMINATOR + u128::from(fee_bips.get())),
                Rounding::Down,
            )
            .ok_or(PoolError::DivisionByZero)?;

        let slots = self.build_slots(params, direction, start_tick)?;
        let mut state = SwapState::new(
            direction,
            start_tick,
            params.limit_tick(),
            net_input,
            slots,
        );

        self.refresh_pass(&mut state)?;

        let inputs = QuoteInputs {
            fee_bips,
            sender: params.sender(),
            recipient: params.recipient(),
            max_quote_levels: self.config.max_quote_levels(),
            contexts: params.context(),
        };
        orchestrator::run(&mut state, &mut self.modules, &inputs)?;

        let outcome = orchestrator::finalize(&state, fee_bips, params.min_amount_out())?;

        // Settlement totals are final: just-in-time deposits close here.
        self.locks.enter(Phase::Deposit)?;

        let mut settlements: Vec<(Address, Amount, Amount, Amount)> =
            Vec::with_capacity(state.slots.len());
        for (idx, slot) in state.slots.iter().enumerate() {
            let fee = outcome.fee_shares.get(idx).copied().unwrap_or(Amount::ZERO);
            if slot.amount_in_filled.is_zero()
                && slot.amount_out_provided.is_zero()
                && fee.is_zero()
            {
                continue;
            }
            settlements.push((
                slot.module,
                slot.amount_in_filled,
                slot.amount_out_provided,
                fee,
            ));
        }
        self.registry
            .apply_swap_commit(direction, &state.refreshes, &settlements)?;

        match direction {
            SwapDirection::ZeroForOne => {
                self.manager_fees0 = self
                    .manager_fees0
                    .checked_add(&outcome.manager_residual)
                    .ok_or(PoolError::Overflow("manager fee accumulator overflow"))?;
            }
            SwapDirection::OneForZero => {
                self.manager_fees1 = self
                    .manager_fees1
                    .checked_add(&outcome.manager_residual)
                    .ok_or(PoolError::Overflow("manager fee accumulator overflow"))?;
            }
        }
        self.spot_tick = state.current_tick;

        // Reopen deposit and withdrawal before any callback fires.
        self.locks.exit(Phase::Deposit);
        self.locks.exit(Phase::Withdrawal);

        let consumed = state.input_consumed()?;
        let amount_in_used = consumed
            .checked_add(&outcome.effective_fee)
            .ok_or(PoolError::Overflow("amount_in_used overflow"))?;

        self.deliver_callbacks(
            &state,
            &outcome.fee_shares,
            amount_in_used,
            outcome.effective_fee,
            &fee_payload,
            params,
        );

        let settlements: Vec<AlmSettlement> = state
            .slots
            .iter()
            .zip(outcome.fee_shares.iter())
            .map(|(slot, &fee)| {
                AlmSettlement::new(
                    slot.module,
                    slot.amount_in_filled,
                    slot.amount_out_provided,
                    fee,
                )
            })
            .collect();

        Ok(SwapSummary::new(
            amount_in_used,
            state.amount_out_total,
            outcome.effective_fee,
            state.start_tick,
            state.current_tick,
            outcome.manager_residual,
            settlements,
        ))
    }

    fn validate_swap_params(
        &self,
        params: &SwapParams,
        now: u64,
    ) -> crate::error::Result<()> {
        if now > params.deadline() {
            return Err(PoolError::DeadlineExpired);
        }
        if !params
            .direction()
            .tick_within_limit(self.spot_tick, params.limit_tick())
        {
            return Err(PoolError::InvalidLimitTick(
                "limit tick is on the wrong side of the spot tick",
            ));
        }

        let active = self.registry.active_count();
        if active == 0 {
            return Err(PoolError::NoActiveModules);
        }
        if params.context().len() != active {
            return Err(PoolError::ContextLengthMismatch);
        }

        let base_count = self.registry.active_base_count();
        let ordering = params.base_ordering();
        if ordering.len() != base_count {
            return Err(PoolError::InvalidAlmOrdering(
                "ordering length does not match the active base count",
            ));
        }
        let mut seen = vec![false; base_count];
        for &index in ordering {
            let Some(slot) = seen.get_mut(index) else {
                return Err(PoolError::InvalidAlmOrdering("index out of range"));
            };
            if *slot {
                return Err(PoolError::InvalidAlmOrdering("duplicate index"));
            }
            *slot = true;
        }
        Ok(())
    }

    fn build_slots(
        &self,
        params: &SwapParams,
        direction: SwapDirection,
        start_tick: Tick,
    ) -> crate::error::Result<Vec<ModuleSlot>> {
        let active = self.registry.active_count();
        let base_count = self.registry.active_base_count();
        let mut slots = Vec::with_capacity(active);
        // Base modules in the caller's order, then metas in registry
        // order.
        for &index in params.base_ordering() {
            let position = self.registry.get_by_index(index)?;
            slots.push(ModuleSlot::from_position(
                position, index, direction, start_tick,
            ));
        }
        for index in base_count..active {
            let position = self.registry.get_by_index(index)?;
            slots.push(ModuleSlot::from_position(
                position, index, direction, start_tick,
            ));
        }
        Ok(slots)
    }

    /// Just-in-time liquidity: modules flagged for refresh may top up
    /// their reserves through the (still open) deposit phase before the
    /// quote rounds begin.  Credits are staged with the swap and only
    /// committed with the settlements.
    fn refresh_pass(&mut self, state: &mut SwapState) -> crate::error::Result<()> {
        let direction = state.direction;
        let spot = state.current_tick;
        for idx in 0..state.slots.len() {
            let (wants_refresh, module_id) = {
                let Some(slot) = state.slots.get(idx) else {
                    continue;
                };
                (slot.wants_refresh, slot.module)
            };
            if !wants_refresh {
                continue;
            }
            let Some(module) = self.modules.get_mut(&module_id) else {
                return Err(PoolError::NotFound);
            };
            let Some((amount0, amount1)) = module.refresh_reserves(direction, spot) else {
                continue;
            };
            if amount0.is_zero() && amount1.is_zero() {
                continue;
            }
            // The deposit phase must be open; holding it for the
            // duration of the credit mirrors the public deposit path.
            self.locks.enter(Phase::Deposit)?;
            let output_side = match direction {
                SwapDirection::ZeroForOne => amount1,
                SwapDirection::OneForZero => amount0,
            };
            let credited = state
                .slots
                .get_mut(idx)
                .and_then(|slot| {
                    let new_reserve = slot.reserve_out_available.checked_add(&output_side)?;
                    slot.reserve_out_available = new_reserve;
                    Some(())
                })
                .ok_or(PoolError::Overflow("refresh credit overflow"));
            if let Err(e) = credited {
                self.locks.exit(Phase::Deposit);
                return Err(e);
            }
            state.refreshes.push((module_id, amount0, amount1));
            if let Some(module) = self.modules.get_mut(&module_id) {
                module.on_deposit(amount0, amount1, &[]);
            }
            self.locks.exit(Phase::Deposit);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn deliver_callbacks(
        &mut self,
        state: &SwapState,
        fee_shares: &[Amount],
        amount_in_used: Amount,
        effective_fee: Amount,
        fee_payload: &[u8],
        params: &SwapParams,
    ) {
        for (idx, slot) in state.slots.iter().enumerate() {
            if !slot.requires_callback {
                continue;
            }
            let reserves_after = self
                .registry
                .get(slot.module)
                .map_or((Amount::ZERO, Amount::ZERO), |(_, p)| {
                    (p.reserve0(), p.reserve1())
                });
            let fee_earned = fee_shares.get(idx).copied().unwrap_or(Amount::ZERO);
            let report = SwapEndReport::new(
                state.direction,
                slot.amount_in_filled,
                slot.amount_out_provided,
                fee_earned,
                reserves_after,
                state.start_tick,
                state.current_tick,
                slot.last_level,
            );
            if let Some(module) = self.modules.get_mut(&slot.module) {
                module.on_swap_end(&report);
            }
        }

        if let Some(fee_module) = self.fee_module.as_mut() {
            fee_module.on_swap_end(
                effective_fee,
                state.current_tick,
                amount_in_used,
                state.amount_out_total,
                fee_payload,
            );
        }
        if let Some(oracle) = self.oracle.as_mut() {
            oracle.on_swap_recorded(
                state.direction,
                amount_in_used,
                effective_fee,
                state.amount_out_total,
                state.current_tick,
                params.limit_tick(),
            );
        }
    }

    /// The pool's settled price tick outside of an in-flight swap.
    #[must_use]
    pub const fn spot_tick(&self) -> Tick {
        self.spot_tick
    }

    /// The price at the spot tick.
    ///
    /// # Errors
    ///
    /// Propagates [`price_at_tick`] failures.
    pub fn spot_price(&self) -> crate::error::Result<Price> {
        price_at_tick(self.spot_tick)
    }

    /// The pool configuration.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Read access to the module registry.
    #[must_use]
    pub const fn registry(&self) -> &AlmRegistry {
        &self.registry
    }

    /// Fee-distribution residuals accumulated for the manager, per
    /// token.
    #[must_use]
    pub const fn manager_fees(&self) -> (Amount, Amount) {
        (self.manager_fees0, self.manager_fees1)
    }

    /// Read access to the phase locks.
    #[must_use]
    pub const fn locks(&self) -> &PhaseLocks {
        &self.locks
    }

    /// Mutable access to the phase locks.
    ///
    /// An escape hatch for callers embedding the pool inside a larger
    /// transactional scope (and for lock-discipline tests); regular
    /// operation never needs it.
    pub fn locks_mut(&mut self) -> &mut PhaseLocks {
        &mut self.locks
    }
}

impl core::fmt::Debug for UniversalPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UniversalPool")
            .field("config", &self.config)
            .field("spot_tick", &self.spot_tick)
            .field("active_modules", &self.registry.active_count())
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}
