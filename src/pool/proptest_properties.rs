//! Property-based tests using `proptest` for engine invariants.
//!
//! Covered properties:
//!
//! 1. **Tick round-trip** — `tick_at_price(price_at_tick(t)) == t`.
//! 2. **Price monotonicity** — higher tick ⇒ strictly higher price.
//! 3. **Registry ordering** — base indices precede meta indices after
//!    arbitrary add/remove interleavings; removed identities are never
//!    reusable.
//! 4. **Swap conservation** — per-module inputs plus the unfilled
//!    remainder equal the net input; per-module outputs equal the total
//!    output; fee shares plus the manager residual equal the effective
//!    fee exactly.
//! 5. **Tick monotonicity** — a swap's end tick never retreats behind
//!    its start tick and never passes the caller's limit.

use proptest::prelude::*;

use crate::config::{AlmConfig, PoolConfig};
use crate::domain::{
    Address, Amount, BasisPoints, LiquidityQuote, QuoteLevel, SwapDirection, Tick,
};
use crate::error::PoolError;
use crate::math::{price_at_tick, tick_at_price};
use crate::pool::UniversalPool;
use crate::registry::AlmRegistry;
use crate::swap::SwapParams;
use crate::traits::{LiquidityModule, QuoteRequest};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn addr(tag: u8) -> Address {
    Address::from_bytes([tag; 32])
}

fn tick(v: i32) -> Tick {
    #[allow(clippy::panic)]
    let Ok(t) = Tick::new(v) else {
        panic!("valid tick");
    };
    t
}

/// A module scripted with a fixed quote ladder.
struct Scripted {
    identity: Address,
    levels: Vec<(u128, i32)>,
}

impl LiquidityModule for Scripted {
    fn identity(&self) -> Address {
        self.identity
    }

    fn quote(&mut self, _request: &QuoteRequest<'_>) -> Result<LiquidityQuote, PoolError> {
        let levels: Vec<QuoteLevel> = self
            .levels
            .iter()
            .map(|&(out, next)| QuoteLevel::new(Amount::new(out), tick(next)))
            .collect();
        LiquidityQuote::new(levels)
    }
}

#[allow(clippy::panic)]
fn pool_with_modules(fee_bips: u32, ladders: &[Vec<(u128, i32)>]) -> UniversalPool {
    let Ok(config) = PoolConfig::new(
        addr(201),
        addr(202),
        addr(203),
        BasisPoints::new(fee_bips),
        Tick::ZERO,
        4,
    ) else {
        panic!("valid config");
    };
    let Ok(mut pool) = UniversalPool::new(config) else {
        panic!("valid pool");
    };
    for (i, ladder) in ladders.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let identity = addr(i as u8 + 1);
        let Ok(cfg) = AlmConfig::base(identity, false, false, false) else {
            panic!("valid module config");
        };
        let module = Scripted {
            identity,
            levels: ladder.clone(),
        };
        let Ok(_) = pool.add_module(&cfg, Box::new(module)) else {
            panic!("module registered");
        };
        let Ok(()) = pool.deposit(
            identity,
            Amount::new(1_000_000_000_000),
            Amount::new(1_000_000_000_000),
            &[],
        ) else {
            panic!("reserves seeded");
        };
    }
    pool
}

#[allow(clippy::panic)]
fn run_swap(pool: &mut UniversalPool, amount_in: u128, limit: i32) -> crate::swap::SwapSummary {
    let base_count = pool.registry().active_base_count();
    let active = pool.registry().active_count();
    let Ok(params) = SwapParams::new(
        SwapDirection::ZeroForOne,
        Amount::new(amount_in),
        Amount::ZERO,
        u64::MAX,
        addr(50),
        addr(51),
        tick(limit),
        (0..base_count).collect(),
        vec![Vec::new(); active],
        Vec::new(),
    ) else {
        panic!("valid params");
    };
    let Ok(summary) = pool.swap(&params, 0) else {
        panic!("swap succeeded");
    };
    summary
}

/// Strategy: a quote ladder of one to three levels whose settle ticks
/// increase strictly and whose last level is terminal.
///
/// Level 0 settles at the start tick (0); each `next` tick stays well
/// below the limits the swap tests use.
fn ladder_strategy() -> impl Strategy<Value = Vec<(u128, i32)>> {
    (
        1usize..=3,
        proptest::collection::vec(0u128..=1_000, 3),
        proptest::collection::vec(1i32..=10, 2),
    )
        .prop_map(|(depth, amounts, steps)| {
            let a = |i: usize| amounts.get(i).copied().unwrap_or(0);
            let t1 = steps.first().copied().unwrap_or(1);
            let t2 = t1 + steps.get(1).copied().unwrap_or(1);
            match depth {
                1 => vec![(a(0), 0)],
                2 => vec![(a(0), t1), (a(1), t1)],
                _ => vec![(a(0), t1), (a(1), t2), (a(2), t2)],
            }
        })
}

// ---------------------------------------------------------------------------
// 1 + 2: tick math
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn tick_price_round_trip(v in -887_272i32..=887_272) {
        let t = tick(v);
        let price = price_at_tick(t).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let rt = tick_at_price(price).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(rt, t);
    }

    #[test]
    fn price_strictly_monotonic(v in -887_271i32..=887_271) {
        let below =
            price_at_tick(tick(v - 1)).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let at = price_at_tick(tick(v)).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let above =
            price_at_tick(tick(v + 1)).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(below.get() < at.get());
        prop_assert!(at.get() < above.get());
    }
}

// ---------------------------------------------------------------------------
// 3: registry ordering under interleaved add/remove
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum RegistryOp {
    AddBase(u8),
    AddMeta(u8),
    Remove(u8),
}

fn registry_ops() -> impl Strategy<Value = Vec<RegistryOp>> {
    proptest::collection::vec(
        prop_oneof![
            (1u8..=20).prop_map(RegistryOp::AddBase),
            (1u8..=20).prop_map(RegistryOp::AddMeta),
            (1u8..=20).prop_map(RegistryOp::Remove),
        ],
        0..40,
    )
}

proptest! {
    #[test]
    fn base_prefix_invariant_holds(ops in registry_ops()) {
        let mut reg = AlmRegistry::new();
        let mut removed: Vec<u8> = Vec::new();

        for op in ops {
            match op {
                RegistryOp::AddBase(tag) => {
                    let Ok(cfg) = AlmConfig::base(addr(tag), false, false, false) else {
                        continue;
                    };
                    let result = reg.add(&cfg);
                    if removed.contains(&tag) {
                        prop_assert_eq!(result, Err(PoolError::AlreadyExists));
                    }
                }
                RegistryOp::AddMeta(tag) => {
                    let Ok(cfg) = AlmConfig::meta(addr(tag), false, false, BasisPoints::ZERO)
                    else {
                        continue;
                    };
                    let result = reg.add(&cfg);
                    if removed.contains(&tag) {
                        prop_assert_eq!(result, Err(PoolError::AlreadyExists));
                    }
                }
                RegistryOp::Remove(tag) => {
                    if reg.remove(addr(tag)).is_ok() {
                        removed.push(tag);
                    }
                }
            }

            // The invariant holds after every operation: all base
            // entries precede all meta entries.
            let split = reg.active_base_count();
            for (i, position) in reg.iter().enumerate() {
                prop_assert_eq!(position.role().is_base(), i < split);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 4 + 5: swap conservation and tick monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn swap_conserves_input_output_and_fees(
        ladders in proptest::collection::vec(ladder_strategy(), 1..=3),
        fee_bips in 0u32..=100,
        amount_in in 1_000_000u128..=1_000_000_000,
    ) {
        let mut pool = pool_with_modules(fee_bips, &ladders);
        let summary = run_swap(&mut pool, amount_in, 100);

        // Output conservation.
        let mut out_sum = Amount::ZERO;
        let mut fee_sum = summary.manager_fee_residual();
        for settlement in summary.settlements() {
            out_sum = out_sum
                .checked_add(&settlement.amount_out_provided())
                .ok_or_else(|| TestCaseError::fail("output overflow"))?;
            fee_sum = fee_sum
                .checked_add(&settlement.fee_share())
                .ok_or_else(|| TestCaseError::fail("fee overflow"))?;
        }
        prop_assert_eq!(out_sum, summary.amount_out());

        // Fee conservation is exact, not within tolerance.
        prop_assert_eq!(fee_sum, summary.effective_fee());

        // Input conservation: the gross input used never exceeds the
        // request, and always covers the fee plus per-module fills.
        prop_assert!(summary.amount_in_used() <= Amount::new(amount_in));
        let mut in_sum = summary.effective_fee();
        for settlement in summary.settlements() {
            in_sum = in_sum
                .checked_add(&settlement.amount_in_filled())
                .ok_or_else(|| TestCaseError::fail("input overflow"))?;
        }
        prop_assert_eq!(in_sum, summary.amount_in_used());
    }

    #[test]
    fn swap_tick_stays_within_direction_and_limit(
        ladders in proptest::collection::vec(ladder_strategy(), 1..=3),
        amount_in in 1_000_000u128..=1_000_000_000,
        limit in 30i32..=120,
    ) {
        let mut pool = pool_with_modules(0, &ladders);
        let summary = run_swap(&mut pool, amount_in, limit);

        // Zero-for-one ticks only move upward, and never pass the limit.
        prop_assert!(summary.end_tick() >= summary.start_tick());
        prop_assert!(summary.end_tick() <= tick(limit));
        prop_assert_eq!(pool.spot_tick(), summary.end_tick());
    }
}
