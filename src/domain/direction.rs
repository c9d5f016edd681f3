//! Swap direction over the canonically ordered token pair.

use core::fmt;

use super::Tick;

/// The direction of a swap over the pool's canonically ordered pair.
///
/// Reserves and quotes are oriented canonically (token0/token1), never
/// input/output; the direction tells the engine which side is which.
///
/// Tick movement is tied to direction: a [`ZeroForOne`](Self::ZeroForOne)
/// swap walks the tick upward toward its limit, a
/// [`OneForZero`](Self::OneForZero) swap walks it downward.  The helpers
/// here encode that orientation so the orchestrator never compares raw
/// tick indices directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Sell token0, receive token1.  Ticks advance upward.
    ZeroForOne,
    /// Sell token1, receive token0.  Ticks advance downward.
    OneForZero,
}

impl SwapDirection {
    /// Returns `true` for [`SwapDirection::ZeroForOne`].
    #[must_use]
    pub const fn is_zero_for_one(&self) -> bool {
        matches!(self, Self::ZeroForOne)
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::ZeroForOne => Self::OneForZero,
            Self::OneForZero => Self::ZeroForOne,
        }
    }

    /// Returns `true` if `candidate` is strictly ahead of `current` in
    /// this direction.
    #[must_use]
    pub const fn tick_is_ahead(&self, candidate: Tick, current: Tick) -> bool {
        match self {
            Self::ZeroForOne => candidate.get() > current.get(),
            Self::OneForZero => candidate.get() < current.get(),
        }
    }

    /// Returns `true` if `tick` has not passed `limit` in this direction
    /// (the limit itself is reachable).
    #[must_use]
    pub const fn tick_within_limit(&self, tick: Tick, limit: Tick) -> bool {
        match self {
            Self::ZeroForOne => tick.get() <= limit.get(),
            Self::OneForZero => tick.get() >= limit.get(),
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroForOne => write!(f, "ZeroForOne"),
            Self::OneForZero => write!(f, "OneForZero"),
        }
    }
}
