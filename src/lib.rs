//! # Medusa AMM
//!
//! Modular liquidity pool engine: independent, pluggable algorithmic
//! liquidity modules (ALMs) supply and price tradable reserves of two
//! tokens, while a central [`UniversalPool`](pool::UniversalPool)
//! coordinates swaps, fees, and accounting.
//!
//! The pool implements no pricing curve of its own.  During a swap it
//! solicits one [`LiquidityQuote`](domain::LiquidityQuote) from every
//! participating module — a depth-bounded ladder of output offers at
//! discrete price ticks — then validates and settles the offers round by
//! round, advancing the tick by the least movement any module proposes,
//! until the input is exhausted, the caller's limit tick is reached, or
//! no module offers further movement.
//!
//! # Highlights
//!
//! - **One external call per module per swap** — modules pre-compute
//!   continuation levels, so multi-round price discovery needs no
//!   re-quoting.
//! - **Base and meta roles** — meta modules aggregate base-module
//!   liquidity and can share a slice of their fee back to the base
//!   modules that opted in.
//! - **Phase-specific locking** — deposits stay open mid-swap so
//!   modules can inject just-in-time liquidity, while withdrawals and
//!   reentrant swaps are barred.
//! - **All-or-nothing settlement** — every validation failure aborts the
//!   swap with no reserve or fee mutation.
//!
//! # Quick Start
//!
//! ```rust
//! use medusa_amm::prelude::*;
//!
//! // A module that offers half the remaining input at the current tick.
//! struct FlatQuoter {
//!     identity: Address,
//! }
//!
//! impl LiquidityModule for FlatQuoter {
//!     fn identity(&self) -> Address {
//!         self.identity
//!     }
//!
//!     fn quote(&mut self, request: &QuoteRequest<'_>) -> Result<LiquidityQuote> {
//!         let half = Amount::new(request.amount_in_remaining().get() / 2);
//!         Ok(LiquidityQuote::single(half, request.current_tick()))
//!     }
//! }
//!
//! // 1. Create the pool.
//! let config = PoolConfig::new(
//!     Address::from_bytes([1u8; 32]), // token0
//!     Address::from_bytes([2u8; 32]), // token1
//!     Address::from_bytes([3u8; 32]), // manager
//!     BasisPoints::new(30),           // default fee: 0.30%
//!     Tick::ZERO,
//!     4,                              // max quote levels
//! )
//! .expect("valid config");
//! let mut pool = UniversalPool::new(config).expect("valid pool");
//!
//! // 2. Register a base module and seed its reserves.
//! let alm = Address::from_bytes([7u8; 32]);
//! let alm_config = AlmConfig::base(alm, false, false, false).expect("valid module config");
//! pool.add_module(&alm_config, Box::new(FlatQuoter { identity: alm }))
//!     .expect("registered");
//! pool.deposit(alm, Amount::ZERO, Amount::new(1_000_000), &[])
//!     .expect("seeded");
//!
//! // 3. Swap.
//! let params = SwapParams::new(
//!     SwapDirection::ZeroForOne,
//!     Amount::new(10_000),
//!     Amount::ZERO,                   // minimum out
//!     u64::MAX,                       // deadline
//!     Address::from_bytes([8u8; 32]), // sender
//!     Address::from_bytes([9u8; 32]), // recipient
//!     Tick::MAX,                      // limit tick
//!     vec![0],                        // base-module ordering
//!     vec![Vec::new()],               // per-module context
//!     Vec::new(),                     // fee-module context
//! )
//! .expect("valid request");
//!
//! let summary = pool.swap(&params, 0).expect("swap succeeded");
//! assert!(summary.amount_out().get() > 0);
//! assert!(summary.effective_fee().get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    Caller     │  SwapParams
//! └──────┬───────┘
//!        │ swap(params, now)
//!        ▼
//! ┌──────────────┐
//! │ UniversalPool │  validation, fee rate, phase locks, commit
//! └──────┬───────┘
//!        │ SwapState (ephemeral)
//!        ▼
//! ┌──────────────┐
//! │ Orchestrator  │  setup round → tick advance → RFQ rounds
//! └──────┬───────┘
//!        │ quote() — once per module
//!        ▼
//! ┌──────────────┐
//! │   Modules     │  LiquidityModule / SwapFeeModule / OracleModule
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Tick`](domain::Tick), [`LiquidityQuote`](domain::LiquidityQuote), … |
//! | [`math`] | Tick-price conversion and rounding-explicit integer arithmetic |
//! | [`traits`] | Collaborator contracts: [`LiquidityModule`](traits::LiquidityModule), [`SwapFeeModule`](traits::SwapFeeModule), [`OracleModule`](traits::OracleModule) |
//! | [`config`] | [`PoolConfig`](config::PoolConfig) and [`AlmConfig`](config::AlmConfig) with validated construction |
//! | [`registry`] | [`AlmRegistry`](registry::AlmRegistry): ordered module records with lifecycle invariants |
//! | [`swap`] | [`SwapParams`](swap::SwapParams), [`SwapSummary`](swap::SwapSummary), and the internal negotiation engine |
//! | [`pool`] | [`UniversalPool`](pool::UniversalPool) coordinator and [`PhaseLocks`](pool::PhaseLocks) |
//! | [`error`] | [`PoolError`](error::PoolError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod registry;
pub mod swap;
pub mod traits;
