//! Precompile subsystem types.
use base64::prelude::*;

pub use primitive_types::{H160, H256, U256};

use crate::{precompile::decode_revert_reason, Error};

/// Ambient information about the call a frame is executing.
#[derive(Clone, Debug, Default)]
pub struct Context {
    /// Address the code executes as.
    pub address: H160,
    /// Account that opened this frame.
    pub caller: H160,
    /// Value apparently transferred with the call. Transfer policy belongs to
    /// the surrounding runtime; precompiles only observe the amount.
    pub apparent_value: U256,
}

/// Result of one call, produced once per invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The call completed; carries the returned bytes.
    Success(Vec<u8>),
    /// The call was rejected and rolled back; carries the revert payload.
    Revert(Vec<u8>),
    /// The offered gas did not cover the call and was forfeited in full.
    OutOfGas,
}

impl Outcome {
    /// Whether the call completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Convert into a result for runtime callers, decoding ABI-framed revert
    /// reasons. Payloads without `Error(string)` framing are surfaced
    /// base64-encoded.
    pub fn into_result(self) -> Result<Vec<u8>, Error> {
        match self {
            Outcome::Success(output) => Ok(output),
            Outcome::Revert(output) => Err(Error::Reverted(
                decode_revert_reason(&output).unwrap_or_else(|| BASE64_STANDARD.encode(&output)),
            )),
            Outcome::OutOfGas => Err(Error::OutOfGas),
        }
    }
}
