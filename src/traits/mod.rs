//! Collaborator contracts consumed by the pool.
//!
//! This module defines the trait boundaries between the pool and its
//! pluggable collaborators: [`LiquidityModule`] for quoting and reserve
//! management, [`SwapFeeModule`] for dynamic fee rates, and
//! [`OracleModule`] for post-swap observations.  The pool validates and
//! aggregates; all pricing logic lives behind these seams.

mod fee_module;
mod liquidity_module;
mod oracle_module;

pub use fee_module::{SwapFeeModule, SwapFeeQuote};
pub use liquidity_module::{LiquidityModule, QuoteRequest, SwapEndReport};
pub use oracle_module::OracleModule;
