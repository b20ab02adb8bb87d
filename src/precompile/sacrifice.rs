//! Deterministic gas sacrifice.
//!
//! Burns exactly the amount of gas named in the call argument, on top of a
//! fixed dispatch overhead. The call returns nothing and touches no state;
//! the burn is only observable through the frame's gas accounting.
use ethabi::{ParamType, Token};

use super::{revert, PrecompileFailure, PrecompileOutput, PrecompileResult};
use crate::{frame::PrecompileHandle, types::U256, Config};

/// Width of the burn-amount argument, in bytes.
const WORD: usize = 32;

/// Decode the burn amount from a single big-endian word.
///
/// Strict width: anything but exactly one word is rejected, with no padding
/// or trimming, so the charge never depends on input size.
fn decode_burn_amount(input: &[u8]) -> Result<U256, PrecompileFailure> {
    if input.len() != WORD {
        return Err(revert("malformed input"));
    }
    let mut tokens =
        ethabi::decode(&[ParamType::Uint(256)], input).map_err(|_| revert("malformed input"))?;
    tokens
        .pop()
        .and_then(Token::into_uint)
        .ok_or_else(|| revert("malformed input"))
}

/// Encode a burn amount as the 32-byte call argument.
pub fn encode_burn_amount(amount: U256) -> Vec<u8> {
    ethabi::encode(&[Token::Uint(amount)])
}

/// Total charge for burning `amount`: the fixed dispatch overhead plus the
/// burn itself. Exceeding the gas-unit width is an error, never a
/// wraparound.
pub(crate) fn sacrifice_cost(amount: U256, overhead: u64) -> Result<u64, PrecompileFailure> {
    let amount = u64::try_from(amount).map_err(|_| revert("cost overflow"))?;
    overhead
        .checked_add(amount)
        .ok_or_else(|| revert("cost overflow"))
}

/// Burn the requested amount of gas from the calling frame.
pub fn call_sacrifice<Cfg: Config>(handle: &mut dyn PrecompileHandle) -> PrecompileResult {
    // Decode before charging anything: malformed input reverts without
    // burning gas.
    let amount = decode_burn_amount(handle.input())?;
    let required = sacrifice_cost(amount, Cfg::SACRIFICE_OVERHEAD_GAS)?;
    handle.record_cost(required)?;

    Ok(PrecompileOutput { output: Vec::new() })
}
