//! Unified error types for the Medusa pool engine.
//!
//! All fallible operations across the crate return [`PoolError`] as their
//! error type.  Every variant identifies one specific failure cause so that
//! callers (and tests) can assert on the exact reason an operation was
//! rejected.
//!
//! # Propagation Policy
//!
//! Errors are never retried internally.  Any error raised during a swap,
//! deposit, or withdrawal aborts the entire operation atomically: no reserve
//! or fee mutation from a failed operation survives.  The caller must
//! resubmit with corrected parameters.

use core::fmt;

use crate::pool::Phase;

/// Convenience alias for `Result<T, PoolError>`.
pub type Result<T> = core::result::Result<T, PoolError>;

/// Unified error enum for every fallible operation in the crate.
///
/// Variants are grouped by the layer that raises them: parameter
/// validation, quote validation, swap outcome, registry lifecycle,
/// phase locking, and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolError {
    // -- Parameter validation ------------------------------------------------
    /// A tick index lies outside the valid range.
    TickOutOfRange(&'static str),
    /// A price lies outside the representable tick-price range.
    PriceOutOfRange(&'static str),
    /// An amount that must be non-zero was zero.
    ZeroAmount(&'static str),
    /// The swap deadline has already passed.
    DeadlineExpired,
    /// A recipient or sender address was the zero address.
    InvalidRecipient(&'static str),
    /// The limit tick is on the wrong side of the spot tick for the
    /// requested direction.
    InvalidLimitTick(&'static str),
    /// The caller-supplied per-module context array does not match the
    /// number of active modules.
    ContextLengthMismatch,
    /// The caller-supplied base-module ordering is not a valid,
    /// duplicate-free permutation of the active base indices.
    InvalidAlmOrdering(&'static str),
    /// The pool has no active liquidity modules to quote against.
    NoActiveModules,

    // -- Quote validation ----------------------------------------------------
    /// A quote level offers more output than the tick-consistent maximum
    /// computable from the remaining input.
    QuoteExceedsExpected,
    /// A proposed next tick reverses direction, stands still when it must
    /// move, or overshoots the limit tick.
    InvalidNextTick(&'static str),
    /// A quote level offers more output than the module's own reserve of
    /// the output token.
    QuoteExceedsReserves,
    /// A quote carries more continuation levels than the pool permits.
    QuoteTooDeep(&'static str),
    /// A quote carried no levels at all.
    EmptyQuote,

    // -- Swap outcome --------------------------------------------------------
    /// The total filled output fell short of the caller's minimum.
    MinimumNotMet,
    /// The fee module reported a rate above the protocol cap.
    FeeRateTooHigh,

    // -- Registry ------------------------------------------------------------
    /// A module identity was the zero address.
    InvalidIdentity(&'static str),
    /// The identity was already registered, or was registered and removed;
    /// identities are never reusable.
    AlreadyExists,
    /// No entry exists for the given identity or index.
    NotFound,
    /// Inserting the position would break the base-before-meta ordering.
    RoleOrderingViolation,
    /// Role and capability flags are inconsistent (a base module with a
    /// fee share, or a meta module requesting quote sharing).
    InvalidFeeShare(&'static str),
    /// A meta fee share above the 50% cap.
    FeeShareTooHigh,
    /// A meta-only operation was attempted on a base module.
    NotMeta,
    /// A withdrawal or settlement would drive a reserve negative.
    InsufficientReserves(&'static str),

    // -- Phase locking -------------------------------------------------------
    /// Reentrant call into a phase that is currently locked.
    Locked(Phase),

    // -- Arithmetic ----------------------------------------------------------
    /// Checked arithmetic overflowed.
    Overflow(&'static str),
    /// Division by zero.
    DivisionByZero,

    // -- Configuration -------------------------------------------------------
    /// A pool or module configuration parameter is out of range or
    /// inconsistent.
    InvalidConfiguration(&'static str),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickOutOfRange(msg) => write!(f, "tick out of range: {msg}"),
            Self::PriceOutOfRange(msg) => write!(f, "price out of range: {msg}"),
            Self::ZeroAmount(msg) => write!(f, "zero amount: {msg}"),
            Self::DeadlineExpired => write!(f, "swap deadline expired"),
            Self::InvalidRecipient(msg) => write!(f, "invalid recipient: {msg}"),
            Self::InvalidLimitTick(msg) => write!(f, "invalid limit tick: {msg}"),
            Self::ContextLengthMismatch => {
                write!(f, "context array length does not match active module count")
            }
            Self::InvalidAlmOrdering(msg) => write!(f, "invalid module ordering: {msg}"),
            Self::NoActiveModules => write!(f, "pool has no active liquidity modules"),
            Self::QuoteExceedsExpected => {
                write!(f, "quote exceeds the tick-consistent maximum output")
            }
            Self::InvalidNextTick(msg) => write!(f, "invalid next tick: {msg}"),
            Self::QuoteExceedsReserves => write!(f, "quote exceeds module reserves"),
            Self::QuoteTooDeep(msg) => write!(f, "quote too deep: {msg}"),
            Self::EmptyQuote => write!(f, "quote carries no levels"),
            Self::MinimumNotMet => write!(f, "output below the caller's minimum"),
            Self::FeeRateTooHigh => write!(f, "fee rate exceeds the protocol cap"),
            Self::InvalidIdentity(msg) => write!(f, "invalid identity: {msg}"),
            Self::AlreadyExists => write!(f, "identity already registered or retired"),
            Self::NotFound => write!(f, "no such registry entry"),
            Self::RoleOrderingViolation => {
                write!(f, "insert would break base-before-meta ordering")
            }
            Self::InvalidFeeShare(msg) => write!(f, "invalid fee share: {msg}"),
            Self::FeeShareTooHigh => write!(f, "meta fee share exceeds the 50% cap"),
            Self::NotMeta => write!(f, "operation requires a meta module"),
            Self::InsufficientReserves(msg) => write!(f, "insufficient reserves: {msg}"),
            Self::Locked(phase) => write!(f, "reentrant call into locked {phase} phase"),
            Self::Overflow(msg) => write!(f, "arithmetic overflow: {msg}"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for PoolError {}
