//! Phase-specific reentrancy locks.
//!
//! Locking is per phase rather than one global mutex, so modules can
//! inject just-in-time liquidity while a swap is mid-flight: at swap
//! start the *swap* and *withdrawal* phases lock (reserves are being
//! recomputed, withdrawals would race them) while *deposit* stays open;
//! once settlement totals are final *deposit* locks too; after commit
//! *deposit* and *withdrawal* reopen before any end-of-swap callbacks
//! fire, and *swap* reopens last.
//!
//! The lock state is a plain copyable record: every pool entry point
//! snapshots it on entry and restores the snapshot on error, so no error
//! path can leak a held lock.

use core::fmt;

/// One lockable phase of pool operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Swap execution.
    Swap,
    /// Module-initiated liquidity deposits.
    Deposit,
    /// Module-initiated liquidity withdrawals.
    Withdrawal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swap => write!(f, "swap"),
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// The pool's three independent phase locks.
///
/// `enter` fails with [`PoolError::Locked`](crate::error::PoolError::Locked)
/// on reentry; `exit` is unconditional.  [`snapshot`](Self::snapshot) /
/// [`restore`](Self::restore) bracket multi-phase operations so that
/// every exit path, including errors, reinstates the prior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseLocks {
    swap: bool,
    deposit: bool,
    withdrawal: bool,
}

impl PhaseLocks {
    /// Creates the all-unlocked state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            swap: false,
            deposit: false,
            withdrawal: false,
        }
    }

    /// Returns `true` if the given phase is currently locked.
    #[must_use]
    pub const fn is_locked(&self, phase: Phase) -> bool {
        match phase {
            Phase::Swap => self.swap,
            Phase::Deposit => self.deposit,
            Phase::Withdrawal => self.withdrawal,
        }
    }

    /// Locks a phase.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Locked`](crate::error::PoolError::Locked)
    /// if the phase is already locked.
    pub fn enter(&mut self, phase: Phase) -> crate::error::Result<()> {
        if self.is_locked(phase) {
            return Err(crate::error::PoolError::Locked(phase));
        }
        self.set(phase, true);
        Ok(())
    }

    /// Unlocks a phase unconditionally.
    pub fn exit(&mut self, phase: Phase) {
        self.set(phase, false);
    }

    /// Captures the current lock state.
    #[must_use]
    pub const fn snapshot(&self) -> Self {
        *self
    }

    /// Reinstates a previously captured lock state.
    pub fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }

    fn set(&mut self, phase: Phase, locked: bool) {
        match phase {
            Phase::Swap => self.swap = locked,
            Phase::Deposit => self.deposit = locked,
            Phase::Withdrawal => self.withdrawal = locked,
        }
    }
}
