//! The multi-round quote-solicitation and settlement engine.
//!
//! Given a prepared [`SwapState`], the orchestrator fills as much of the
//! input as the participating modules will support without crossing the
//! caller's limit tick:
//!
//! 1. **Setup round** — every participating module is asked for one
//!    [`LiquidityQuote`](crate::domain::LiquidityQuote); its first level
//!    is validated and settled at the current tick immediately.
//! 2. **Tick advance** — the new current tick is the least directional
//!    movement among all pending continuation heads.
//! 3. **Request-for-quote rounds** — continuation levels whose tick
//!    equals the new current tick are settled, without calling back into
//!    the modules: one external call per module per swap.
//! 4. **Termination** — on exhausted input, exhausted continuations, or
//!    the limit tick (partial fill).
//!
//! Any validation failure aborts the whole swap; nothing is committed
//! because all accounting is staged in the [`SwapState`].
//!
//! # Fee Post-Processing
//!
//! After the rounds terminate, [`finalize`] checks the caller's minimum,
//! scales the fee to the input actually consumed (a partial fill is
//! never charged for the unfilled remainder), distributes it across the
//! modules in proportion to output provided, and runs the meta-fee-share
//! redistribution toward quote-sharing base modules.  Per-module shares
//! round down; every rounding residual is retained for the pool manager,
//! so the distribution always sums exactly to the effective fee.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use super::state::SwapState;
use crate::domain::{Address, Amount, BasisPoints, QuoteLevel, Rounding};
use crate::error::PoolError;
use crate::math::{amount_in_at_tick, amount_out_at_tick};
use crate::traits::{LiquidityModule, QuoteRequest};

/// Immutable per-swap inputs shared by every quote request.
pub(crate) struct QuoteInputs<'a> {
    pub(crate) fee_bips: BasisPoints,
    pub(crate) sender: Address,
    pub(crate) recipient: Address,
    pub(crate) max_quote_levels: usize,
    pub(crate) contexts: &'a [Vec<u8>],
}

/// Result of the fee post-processing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SwapOutcome {
    pub(crate) effective_fee: Amount,
    /// Fee share per slot, parallel to `SwapState::slots`.
    pub(crate) fee_shares: Vec<Amount>,
    /// Rounding residual retained by the pool manager.
    pub(crate) manager_residual: Amount,
}

/// Runs the setup round and all request-for-quote rounds.
///
/// # Errors
///
/// Propagates every quote-validation failure
/// ([`PoolError::QuoteExceedsExpected`], [`PoolError::InvalidNextTick`],
/// [`PoolError::QuoteExceedsReserves`], [`PoolError::QuoteTooDeep`]) and
/// any module error, aborting the swap.
pub(crate) fn run(
    state: &mut SwapState,
    modules: &mut BTreeMap<Address, Box<dyn LiquidityModule>>,
    inputs: &QuoteInputs<'_>,
) -> crate::error::Result<()> {
    setup_round(state, modules, inputs)?;

    while !state.amount_in_remaining.is_zero() {
        let Some(next) = state.next_tick_candidate() else {
            break;
        };
        if !state.direction.tick_within_limit(next, state.limit_tick) {
            // Partial fill: the limit is reached before the input is
            // exhausted.
            break;
        }
        state.current_tick = next;
        rfq_round(state)?;
    }
    Ok(())
}

/// Solicits one quote from every participating module and settles each
/// quote's first level at the current tick.
fn setup_round(
    state: &mut SwapState,
    modules: &mut BTreeMap<Address, Box<dyn LiquidityModule>>,
    inputs: &QuoteInputs<'_>,
) -> crate::error::Result<()> {
    for idx in 0..state.slots.len() {
        let (module_id, registry_index) = {
            let Some(slot) = state.slots.get(idx) else {
                return Err(PoolError::NotFound);
            };
            (slot.module, slot.registry_index)
        };
        let context = inputs
            .contexts
            .get(registry_index)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let request = QuoteRequest::new(
            state.direction,
            state.amount_in_remaining,
            state.current_tick,
            state.limit_tick,
            inputs.fee_bips,
            inputs.sender,
            inputs.recipient,
            context,
        );
        let module = modules.get_mut(&module_id).ok_or(PoolError::NotFound)?;
        let quote = module.quote(&request)?;
        if quote.depth() > inputs.max_quote_levels {
            return Err(PoolError::QuoteTooDeep(
                "quote depth exceeds the pool's continuation bound",
            ));
        }

        let mut levels: VecDeque<QuoteLevel> = quote.into_levels().into();
        // The constructor guarantees at least one level.
        let Some(first) = levels.pop_front() else {
            return Err(PoolError::EmptyQuote);
        };
        if let Some(slot) = state.slots.get_mut(idx) {
            slot.pending = levels;
        }
        settle_level(state, idx, first)?;
    }
    Ok(())
}

/// Settles every pending continuation head that matures at the current
/// tick.
fn rfq_round(state: &mut SwapState) -> crate::error::Result<()> {
    for idx in 0..state.slots.len() {
        let matured = {
            let Some(slot) = state.slots.get(idx) else {
                continue;
            };
            slot.participating && slot.wait_tick == state.current_tick
        };
        if !matured {
            continue;
        }
        let Some(level) = state
            .slots
            .get_mut(idx)
            .and_then(|slot| slot.pending.pop_front())
        else {
            continue;
        };
        settle_level(state, idx, level)?;
        if state.amount_in_remaining.is_zero() {
            break;
        }
    }
    Ok(())
}

/// Validates one quote level at the current tick and settles it against
/// the remaining input.
fn settle_level(
    state: &mut SwapState,
    idx: usize,
    level: QuoteLevel,
) -> crate::error::Result<()> {
    let direction = state.direction;
    let tick = state.current_tick;
    let limit = state.limit_tick;
    let remaining = state.amount_in_remaining;

    let amount_out = level.amount_out();

    // The tick-consistent maximum the remaining input can buy.
    let max_out = amount_out_at_tick(direction, remaining, tick)?;
    if amount_out > max_out {
        return Err(PoolError::QuoteExceedsExpected);
    }

    let Some(slot) = state.slots.get(idx) else {
        return Err(PoolError::NotFound);
    };
    if amount_out > slot.reserve_out_available {
        return Err(PoolError::QuoteExceedsReserves);
    }
    let is_base = slot.role.is_base();

    // Classify the proposed continuation before mutating anything.
    let next = level.next_tick();
    let terminal = if next == tick {
        true
    } else if direction.tick_is_ahead(next, tick) && direction.tick_within_limit(next, limit) {
        false
    } else if is_base {
        // Base modules may not reverse the price or overshoot the limit.
        return Err(PoolError::InvalidNextTick(
            "next tick must advance with the swap direction and stay within the limit",
        ));
    } else {
        // An aggregating module proposing a non-directional tick simply
        // offers no further movement.
        true
    };

    // Input owed at this tick, rounded in the pool's favor.  The
    // validation above bounds it by the remaining input; `min` absorbs
    // the one-unit excess the up-rounding can introduce.
    let amount_in_owed = if amount_out.is_zero() {
        Amount::ZERO
    } else {
        amount_in_at_tick(direction, amount_out, tick)?.min(remaining)
    };

    state.amount_in_remaining = state
        .amount_in_remaining
        .checked_sub(&amount_in_owed)
        .ok_or(PoolError::Overflow("input underflow during settlement"))?;
    state.amount_out_total = state
        .amount_out_total
        .checked_add(&amount_out)
        .ok_or(PoolError::Overflow("output accumulator overflow"))?;

    let Some(slot) = state.slots.get_mut(idx) else {
        return Err(PoolError::NotFound);
    };
    slot.amount_in_filled = slot
        .amount_in_filled
        .checked_add(&amount_in_owed)
        .ok_or(PoolError::Overflow("slot input accumulator overflow"))?;
    slot.amount_out_provided = slot
        .amount_out_provided
        .checked_add(&amount_out)
        .ok_or(PoolError::Overflow("slot output accumulator overflow"))?;
    slot.reserve_out_available = slot
        .reserve_out_available
        .checked_sub(&amount_out)
        .ok_or(PoolError::QuoteExceedsReserves)?;
    slot.last_level = Some(level);
    slot.wait_tick = next;
    slot.participating = !terminal && !slot.pending.is_empty();
    Ok(())
}

/// Post-processing: minimum-output check, effective fee, proportional
/// distribution, and meta-fee-share redistribution.
///
/// # Errors
///
/// - [`PoolError::MinimumNotMet`] if the filled output is below the
///   caller's minimum.
/// - [`PoolError::Overflow`] on any accumulator overflow.
pub(crate) fn finalize(
    state: &SwapState,
    fee_bips: BasisPoints,
    min_amount_out: Amount,
) -> crate::error::Result<SwapOutcome> {
    if state.amount_out_total < min_amount_out {
        return Err(PoolError::MinimumNotMet);
    }
    let consumed = state.input_consumed()?;
    // The fee is charged on the input actually consumed, so a partial
    // fill is never overcharged relative to the filled portion.
    let effective_fee = fee_bips.apply(consumed, Rounding::Up)?;
    distribute_fee(state, effective_fee)
}

/// Splits the effective fee across the slots in proportion to output
/// provided, then redistributes each meta module's configured share to
/// the quote-sharing base modules.
fn distribute_fee(state: &SwapState, effective_fee: Amount) -> crate::error::Result<SwapOutcome> {
    let slot_count = state.slots.len();
    let mut fee_shares = vec![Amount::ZERO; slot_count];
    let total_out = state.amount_out_total;

    if effective_fee.is_zero() || total_out.is_zero() {
        return Ok(SwapOutcome {
            effective_fee,
            fee_shares,
            manager_residual: effective_fee,
        });
    }

    let mut distributed = Amount::ZERO;
    for (idx, slot) in state.slots.iter().enumerate() {
        let share = effective_fee
            .mul_div(slot.amount_out_provided, total_out, Rounding::Down)
            .ok_or(PoolError::DivisionByZero)?;
        if let Some(entry) = fee_shares.get_mut(idx) {
            *entry = share;
        }
        distributed = distributed
            .checked_add(&share)
            .ok_or(PoolError::Overflow("fee distribution overflow"))?;
    }
    let mut manager_residual = effective_fee
        .checked_sub(&distributed)
        .ok_or(PoolError::Overflow("fee shares exceed effective fee"))?;

    // Output contributed by base modules that opted into quote sharing.
    let mut sharing_total = Amount::ZERO;
    for slot in &state.slots {
        if slot.role.is_base() && slot.shares_quotes {
            sharing_total = sharing_total
                .checked_add(&slot.amount_out_provided)
                .ok_or(PoolError::Overflow("sharing total overflow"))?;
        }
    }

    for idx in 0..slot_count {
        let (is_meta, meta_share_bips, slot_fee) = {
            let Some(slot) = state.slots.get(idx) else {
                continue;
            };
            let Some(&fee) = fee_shares.get(idx) else {
                continue;
            };
            (slot.role.is_meta(), slot.meta_fee_share, fee)
        };
        if !is_meta || meta_share_bips.get() == 0 || slot_fee.is_zero() {
            continue;
        }
        // With no opted-in base output the meta module keeps its share.
        if sharing_total.is_zero() {
            continue;
        }
        let redistributed = meta_share_bips.apply(slot_fee, Rounding::Down)?;
        if redistributed.is_zero() {
            continue;
        }
        if let Some(entry) = fee_shares.get_mut(idx) {
            *entry = entry
                .checked_sub(&redistributed)
                .ok_or(PoolError::Overflow("meta share underflow"))?;
        }

        let mut passed_on = Amount::ZERO;
        for (jdx, slot) in state.slots.iter().enumerate() {
            if !(slot.role.is_base() && slot.shares_quotes) {
                continue;
            }
            let part = redistributed
                .mul_div(slot.amount_out_provided, sharing_total, Rounding::Down)
                .ok_or(PoolError::DivisionByZero)?;
            if let Some(entry) = fee_shares.get_mut(jdx) {
                *entry = entry
                    .checked_add(&part)
                    .ok_or(PoolError::Overflow("base share overflow"))?;
            }
            passed_on = passed_on
                .checked_add(&part)
                .ok_or(PoolError::Overflow("redistribution overflow"))?;
        }
        // Redistribution rounding residual also goes to the manager.
        let leftover = redistributed
            .checked_sub(&passed_on)
            .ok_or(PoolError::Overflow("redistribution exceeds meta share"))?;
        manager_residual = manager_residual
            .checked_add(&leftover)
            .ok_or(PoolError::Overflow("manager residual overflow"))?;
    }

    Ok(SwapOutcome {
        effective_fee,
        fee_shares,
        manager_residual,
    })
}
