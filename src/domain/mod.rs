//! Fundamental domain value types used throughout the pool engine.
//!
//! This module contains the core value types that model the domain:
//! addresses, amounts, basis points, ticks, prices, swap directions, and
//! liquidity quotes.  All types use newtypes with validated constructors
//! to enforce invariants.

mod address;
mod amount;
mod basis_points;
mod direction;
mod price;
mod quote;
mod rounding;
mod tick;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use direction::SwapDirection;
pub use price::Price;
pub use quote::{LiquidityQuote, QuoteLevel};
pub use rounding::Rounding;
pub use tick::Tick;
