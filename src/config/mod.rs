//! Pool and module configuration structs.
//!
//! [`PoolConfig`] fixes a pool's immutable parameters; [`AlmConfig`]
//! describes one module registration.  Both validate their invariants at
//! construction, so a successfully built configuration is always usable.

mod alm;
mod pool;

pub use alm::AlmConfig;
pub use pool::{PoolConfig, DEFAULT_MAX_QUOTE_LEVELS, MAX_SWAP_FEE_BIPS};
