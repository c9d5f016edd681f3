//! Pluggable post-swap oracle notification.

use crate::domain::{Amount, SwapDirection, Tick};

/// Contract for an optional oracle collaborator.
///
/// The pool notifies the oracle after every completed swap, once all
/// settlement has committed.  What the oracle does with the observation
/// (TWAP accumulation, volatility tracking) is out of scope here.
pub trait OracleModule {
    /// Records one completed swap.
    #[allow(clippy::too_many_arguments)]
    fn on_swap_recorded(
        &mut self,
        direction: SwapDirection,
        amount_in_used: Amount,
        effective_fee: Amount,
        amount_out: Amount,
        end_tick: Tick,
        limit_tick: Tick,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe() {
        struct Recorder(u32);
        impl OracleModule for Recorder {
            fn on_swap_recorded(
                &mut self,
                _direction: SwapDirection,
                _amount_in_used: Amount,
                _effective_fee: Amount,
                _amount_out: Amount,
                _end_tick: Tick,
                _limit_tick: Tick,
            ) {
                self.0 += 1;
            }
        }

        let mut oracle: Box<dyn OracleModule> = Box::new(Recorder(0));
        oracle.on_swap_recorded(
            SwapDirection::ZeroForOne,
            Amount::new(1),
            Amount::ZERO,
            Amount::new(1),
            Tick::ZERO,
            Tick::MAX,
        );
    }
}
