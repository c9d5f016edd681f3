//! Pure arithmetic for the pool engine.
//!
//! This module provides the integer rounding helpers ([`div_round`],
//! [`mul_div`]) and the tick-price functions the swap engine is built
//! on.  Everything here is stateless and deterministic.

mod rounding;
mod tick_math;

pub use rounding::{div_round, mul_div};
pub use tick_math::{amount_in_at_tick, amount_out_at_tick, price_at_tick, tick_at_price};
