//! Ephemeral per-swap working state.
//!
//! A [`SwapState`] is created fresh for every swap, threaded through the
//! orchestrator's rounds, and destroyed when the swap ends.  All
//! per-swap accounting is staged here; the registry and pool-level
//! accumulators are only touched by the pool's commit step after the
//! whole negotiation has succeeded, which is what makes a failed swap
//! free of side effects.

use std::collections::VecDeque;

use crate::domain::{Address, Amount, BasisPoints, QuoteLevel, SwapDirection, Tick};
use crate::error::PoolError;
use crate::registry::{AlmPosition, AlmRole};

/// One participating module's working data.
///
/// `pending` holds the continuation levels not yet settled; `wait_tick`
/// is the tick at which the head of `pending` settles.  A slot stops
/// participating when its module proposes no further movement or its
/// continuation is exhausted.
#[derive(Debug)]
pub(crate) struct ModuleSlot {
    pub(crate) module: Address,
    pub(crate) role: AlmRole,
    /// Dense registry index; selects the caller-supplied context blob.
    pub(crate) registry_index: usize,
    pub(crate) requires_callback: bool,
    pub(crate) shares_quotes: bool,
    pub(crate) wants_refresh: bool,
    pub(crate) meta_fee_share: BasisPoints,
    /// Output-token reserve still available to quote against: the
    /// registry snapshot plus staged refresh credits minus output
    /// already provided in this swap.
    pub(crate) reserve_out_available: Amount,
    pub(crate) participating: bool,
    pub(crate) wait_tick: Tick,
    pub(crate) pending: VecDeque<QuoteLevel>,
    pub(crate) amount_in_filled: Amount,
    pub(crate) amount_out_provided: Amount,
    pub(crate) last_level: Option<QuoteLevel>,
}

impl ModuleSlot {
    /// Builds a slot from a registry position, snapshotting the reserve
    /// of the output token for the given direction.
    pub(crate) fn from_position(
        position: &AlmPosition,
        registry_index: usize,
        direction: SwapDirection,
        start_tick: Tick,
    ) -> Self {
        Self {
            module: position.module(),
            role: position.role(),
            registry_index,
            requires_callback: position.requires_callback(),
            shares_quotes: position.shares_quotes(),
            wants_refresh: position.refresh_reserves(),
            meta_fee_share: position.meta_fee_share(),
            reserve_out_available: position.output_reserve(direction),
            participating: true,
            wait_tick: start_tick,
            pending: VecDeque::new(),
            amount_in_filled: Amount::ZERO,
            amount_out_provided: Amount::ZERO,
            last_level: None,
        }
    }
}

/// Working state for one swap, owned exclusively by the orchestrator
/// for the swap's duration.
#[derive(Debug)]
pub(crate) struct SwapState {
    pub(crate) direction: SwapDirection,
    pub(crate) start_tick: Tick,
    pub(crate) current_tick: Tick,
    pub(crate) limit_tick: Tick,
    /// Net input (fee already deducted) handed to the orchestrator.
    pub(crate) net_input: Amount,
    pub(crate) amount_in_remaining: Amount,
    pub(crate) amount_out_total: Amount,
    pub(crate) slots: Vec<ModuleSlot>,
    /// Just-in-time reserve credits staged during the refresh pass,
    /// committed together with the settlements.
    pub(crate) refreshes: Vec<(Address, Amount, Amount)>,
}

impl SwapState {
    pub(crate) fn new(
        direction: SwapDirection,
        start_tick: Tick,
        limit_tick: Tick,
        net_input: Amount,
        slots: Vec<ModuleSlot>,
    ) -> Self {
        Self {
            direction,
            start_tick,
            current_tick: start_tick,
            limit_tick,
            net_input,
            amount_in_remaining: net_input,
            amount_out_total: Amount::ZERO,
            slots,
            refreshes: Vec::new(),
        }
    }

    /// Net input consumed so far.
    pub(crate) fn input_consumed(&self) -> crate::error::Result<Amount> {
        self.net_input
            .checked_sub(&self.amount_in_remaining)
            .ok_or(PoolError::Overflow("remaining input exceeds net input"))
    }

    /// The least directional movement among all pending continuation
    /// heads, or `None` when no module proposes further movement.
    pub(crate) fn next_tick_candidate(&self) -> Option<Tick> {
        let mut best: Option<Tick> = None;
        for slot in &self.slots {
            if !slot.participating || slot.pending.is_empty() {
                continue;
            }
            if !self.direction.tick_is_ahead(slot.wait_tick, self.current_tick) {
                continue;
            }
            best = match best {
                None => Some(slot.wait_tick),
                // Least movement wins: the candidate closest to the
                // current tick in the swap's direction.
                Some(current_best) => {
                    if self.direction.tick_is_ahead(current_best, slot.wait_tick) {
                        Some(slot.wait_tick)
                    } else {
                        Some(current_best)
                    }
                }
            };
        }
        best
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::from_bytes([tag; 32])
    }

    fn tick(v: i32) -> Tick {
        let Ok(t) = Tick::new(v) else {
            panic!("valid tick");
        };
        t
    }

    fn slot(tag: u8, wait: i32, pending: usize, participating: bool) -> ModuleSlot {
        let mut queue = VecDeque::new();
        for _ in 0..pending {
            queue.push_back(QuoteLevel::new(Amount::new(1), tick(wait)));
        }
        ModuleSlot {
            module: addr(tag),
            role: AlmRole::Base,
            registry_index: 0,
            requires_callback: false,
            shares_quotes: false,
            wants_refresh: false,
            meta_fee_share: BasisPoints::ZERO,
            reserve_out_available: Amount::new(1_000),
            participating,
            wait_tick: tick(wait),
            pending: queue,
            amount_in_filled: Amount::ZERO,
            amount_out_provided: Amount::ZERO,
            last_level: None,
        }
    }

    fn state(slots: Vec<ModuleSlot>) -> SwapState {
        SwapState::new(
            SwapDirection::ZeroForOne,
            Tick::ZERO,
            Tick::MAX,
            Amount::new(100),
            slots,
        )
    }

    #[test]
    fn input_consumed_tracks_remaining() {
        let mut s = state(vec![]);
        let Ok(consumed) = s.input_consumed() else {
            panic!("expected Ok");
        };
        assert_eq!(consumed, Amount::ZERO);
        s.amount_in_remaining = Amount::new(40);
        let Ok(consumed) = s.input_consumed() else {
            panic!("expected Ok");
        };
        assert_eq!(consumed, Amount::new(60));
    }

    #[test]
    fn candidate_picks_least_movement() {
        let s = state(vec![slot(1, 5, 1, true), slot(2, 2, 1, true), slot(3, 9, 1, true)]);
        assert_eq!(s.next_tick_candidate(), Some(tick(2)));
    }

    #[test]
    fn candidate_ignores_non_participating_and_exhausted() {
        let s = state(vec![
            slot(1, 2, 1, false),
            slot(2, 3, 0, true),
            slot(3, 7, 2, true),
        ]);
        assert_eq!(s.next_tick_candidate(), Some(tick(7)));
    }

    #[test]
    fn candidate_none_when_no_movement() {
        let s = state(vec![slot(1, 0, 1, true)]);
        assert_eq!(s.next_tick_candidate(), None);
    }

    #[test]
    fn candidate_downward_direction() {
        let mut s = state(vec![slot(1, -3, 1, true), slot(2, -8, 1, true)]);
        s.direction = SwapDirection::OneForZero;
        // Least movement downward is the tick closest below current.
        assert_eq!(s.next_tick_candidate(), Some(tick(-3)));
    }
}
