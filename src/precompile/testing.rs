//! Helpers for driving precompile calls in tests and benchmarks.
use crate::{
    frame::CallContext,
    types::{Context, Outcome, H160},
    Config,
};

use super::Precompiles;

/// Execute one call against a fresh precompile set.
///
/// Returns `None` when the address is not a registered precompile.
pub fn call_contract<Cfg: Config>(address: H160, input: &[u8], gas_limit: u64) -> Option<Outcome> {
    call_contract_opts::<Cfg>(address, input, gas_limit, false).map(|(outcome, _)| outcome)
}

/// Execute one call, reporting the gas the frame consumed alongside the
/// outcome.
pub fn call_contract_opts<Cfg: Config>(
    address: H160,
    input: &[u8],
    gas_limit: u64,
    read_only: bool,
) -> Option<(Outcome, u64)> {
    let precompiles = Precompiles::<Cfg>::new();
    let mut ctx = if read_only {
        CallContext::new_static(address, Context::default(), input, gas_limit)
    } else {
        CallContext::new(address, Context::default(), input, gas_limit)
    };
    let outcome = precompiles.execute(&mut ctx)?;

    Some((outcome, ctx.gas_used()))
}
