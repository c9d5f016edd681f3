//! Liquidity quotes: a module's offer of output at discrete price levels.

use core::fmt;

use super::{Amount, Tick};
use crate::error::PoolError;

/// One price level of a module's quote: an output amount offered at the
/// level's settle tick, plus the tick at which the module is willing to
/// supply more.
///
/// A level whose `next_tick` equals the tick it settles at is terminal:
/// the module offers no further movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteLevel {
    amount_out: Amount,
    next_tick: Tick,
}

impl QuoteLevel {
    /// Creates a new quote level.
    ///
    /// A zero `amount_out` is valid: a module may decline to fill at the
    /// current level while still proposing price movement.
    #[must_use]
    pub const fn new(amount_out: Amount, next_tick: Tick) -> Self {
        Self {
            amount_out,
            next_tick,
        }
    }

    /// Returns the output amount offered at this level.
    #[must_use]
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Returns the tick at which the module will supply more.
    #[must_use]
    pub const fn next_tick(&self) -> Tick {
        self.next_tick
    }
}

impl fmt::Display for QuoteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuoteLevel(out={}, next={})", self.amount_out, self.next_tick)
    }
}

/// A module's complete offer for one swap: a depth-bounded list of
/// [`QuoteLevel`]s.
///
/// Level 0 is settled at the tick current when the module was asked to
/// quote; level *k* is settled when the engine's tick reaches level
/// *k−1*'s `next_tick`.  Pre-computing several levels at once lets a
/// module participate in every round of a swap while being called
/// exactly once.
///
/// The engine bounds the number of levels per quote
/// ([`PoolConfig::max_quote_levels`](crate::config::PoolConfig::max_quote_levels));
/// the bound is checked when the quote enters the engine, not here, so
/// modules can build quotes without knowing pool configuration.
///
/// # Examples
///
/// ```
/// use medusa_amm::domain::{Amount, LiquidityQuote, QuoteLevel, Tick};
///
/// let quote = LiquidityQuote::new(vec![
///     QuoteLevel::new(Amount::new(1_000), Tick::new(5).unwrap_or(Tick::ZERO)),
///     QuoteLevel::new(Amount::new(500), Tick::new(5).unwrap_or(Tick::ZERO)),
/// ]);
/// assert!(quote.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiquidityQuote {
    levels: Vec<QuoteLevel>,
}

impl LiquidityQuote {
    /// Creates a quote from its levels.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyQuote`] if `levels` is empty.
    pub fn new(levels: Vec<QuoteLevel>) -> crate::error::Result<Self> {
        if levels.is_empty() {
            return Err(PoolError::EmptyQuote);
        }
        Ok(Self { levels })
    }

    /// Creates a single-level quote.
    ///
    /// Shorthand for modules that do not pre-compute continuation levels.
    #[must_use]
    pub fn single(amount_out: Amount, next_tick: Tick) -> Self {
        Self {
            levels: vec![QuoteLevel::new(amount_out, next_tick)],
        }
    }

    /// Returns the quote levels in settle order.
    #[must_use]
    pub fn levels(&self) -> &[QuoteLevel] {
        &self.levels
    }

    /// Returns the number of levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Consumes the quote, returning its levels.
    #[must_use]
    pub fn into_levels(self) -> Vec<QuoteLevel> {
        self.levels
    }
}
