//! The pool coordinator and its phase-lock discipline.

mod locks;
mod universal;

#[cfg(test)]
mod proptest_properties;

pub use locks::{Phase, PhaseLocks};
pub use universal::UniversalPool;
