#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod std_impl;

pub use error::*;
pub mod extras;

/// Checks a value against its own form-level rules.
///
/// Implementations are written by hand; builders from [`ValidateError`]
/// collect per-field messages and [`ValidateError::into_result`] turns
/// an empty collection into `Ok(())`.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidateError>;
}

pub trait HasLength {
    fn length(&self) -> usize;
}
