//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use medusa_amm::prelude::*;
//! ```

// Domain value types
pub use crate::domain::{
    Address, Amount, BasisPoints, LiquidityQuote, Price, QuoteLevel, Rounding, SwapDirection, Tick,
};

// Collaborator contracts
pub use crate::traits::{
    LiquidityModule, OracleModule, QuoteRequest, SwapEndReport, SwapFeeModule, SwapFeeQuote,
};

// Configuration
pub use crate::config::{AlmConfig, PoolConfig};

// Registry
pub use crate::registry::{AlmPosition, AlmRegistry, AlmRole, AlmStatus};

// Swap request/outcome
pub use crate::swap::{AlmSettlement, SwapParams, SwapSummary};

// The pool
pub use crate::pool::{Phase, PhaseLocks, UniversalPool};

// Errors
pub use crate::error::{PoolError, Result};
