//! Gas-metering precompiles for an EVM-compatible runtime.
//!
//! This crate binds reserved contract addresses to native handlers and
//! implements the gas sacrifice precompile: a call that deterministically
//! consumes a caller-specified quantity of gas and returns nothing. Dispatch
//! is indistinguishable from an ordinary contract call at that address, so
//! the cost model is observable purely through receipt-level gas usage.
//!
//! The surrounding runtime owns transaction execution, state and consensus;
//! it drives this crate through [`precompile::Precompiles`] and
//! [`frame::CallContext`].

use std::collections::BTreeMap;

use thiserror::Error;

pub mod frame;
pub mod precompile;
pub mod types;

use precompile::PrecompileFn;
use types::H160;

/// Module configuration.
pub trait Config: 'static {
    /// Gas charged for the dispatch machinery of the sacrifice precompile
    /// (address resolution and call/return framing), independent of the burn
    /// amount.
    ///
    /// This constant is pinned per runtime version: changing it changes the
    /// gas accounting of every block produced under the new version.
    const SACRIFICE_OVERHEAD_GAS: u64;

    /// Provides additional precompiles to register alongside the builtin
    /// ones.
    ///
    /// If a returned address collides with a builtin precompile, the
    /// returned handler replaces the builtin one.
    fn additional_precompiles() -> Option<BTreeMap<H160, PrecompileFn>> {
        None
    }
}

/// Errors emitted by the precompile subsystem.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reverted: {0}")]
    Reverted(String),

    #[error("out of gas")]
    OutOfGas,
}
