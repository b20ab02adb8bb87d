//! EVM precompiles.
use std::{collections::BTreeMap, marker::PhantomData};

use ethabi::ParamType;
use slog::{debug, info, o, Discard, Logger};
use thiserror::Error;

use crate::{
    frame::{CallContext, PrecompileHandle},
    types::{Outcome, H160},
    Config,
};

pub mod sacrifice;
#[cfg(any(test, feature = "test"))]
pub mod testing;

/// Address of the gas sacrifice precompile.
pub const PRECOMPILE_SACRIFICE: H160 = H160([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01, 0xFF,
]);

/// Output of a successful precompile invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrecompileOutput {
    /// Bytes returned to the caller.
    pub output: Vec<u8>,
}

/// Failure of a precompile invocation.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PrecompileFailure {
    /// The call is rejected and rolled back.
    #[error("reverted")]
    Revert {
        /// ABI-encoded revert payload.
        output: Vec<u8>,
    },
    /// The frame's budget cannot cover the call; all offered gas is
    /// forfeited.
    #[error("out of gas")]
    OutOfGas,
}

/// The type precompile invocations return.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileFailure>;

/// The type used for precompile handlers in the dispatch map.
pub type PrecompileFn = fn(&mut dyn PrecompileHandle) -> PrecompileResult;

/// What executes at an address, resolved once per call.
#[derive(Clone, Copy, Debug)]
pub enum Executable {
    /// Native handler registered for the address.
    Precompile(PrecompileFn),
    /// No precompile here; the runtime's ordinary account and bytecode
    /// handling applies.
    Bytecode,
}

/// The set of configured precompiles.
///
/// Built once at startup from [`Config`] and handed to the execution
/// runtime; never mutated afterwards.
pub struct Precompiles<Cfg: Config> {
    contracts: BTreeMap<H160, PrecompileFn>,
    logger: Logger,
    _cfg: PhantomData<Cfg>,
}

impl<Cfg: Config> Precompiles<Cfg> {
    /// Create the precompile set with logging discarded.
    pub fn new() -> Self {
        Self::with_logger(Logger::root(Discard, o!()))
    }

    /// Create the precompile set, logging the registration table.
    pub fn with_logger(logger: Logger) -> Self {
        let mut contracts = BTreeMap::from([(
            PRECOMPILE_SACRIFICE,
            sacrifice::call_sacrifice::<Cfg> as PrecompileFn,
        )]);
        if let Some(additional) = Cfg::additional_precompiles() {
            contracts.extend(additional);
        }
        for address in contracts.keys() {
            info!(logger, "registered precompile"; "address" => ?address);
        }

        Self {
            contracts,
            logger,
            _cfg: PhantomData,
        }
    }

    /// Resolve what executes at `address`.
    pub fn resolve(&self, address: H160) -> Executable {
        match self.contracts.get(&address) {
            Some(precompile) => Executable::Precompile(*precompile),
            None => Executable::Bytecode,
        }
    }

    /// Run a resolved handler in the given frame, applying out-of-gas
    /// forfeiture semantics.
    pub fn invoke(&self, precompile: PrecompileFn, ctx: &mut CallContext<'_>) -> Outcome {
        match precompile(ctx) {
            Ok(output) => Outcome::Success(output.output),
            Err(PrecompileFailure::Revert { output }) => {
                debug!(self.logger, "precompile reverted"; "address" => ?ctx.code_address());
                Outcome::Revert(output)
            }
            Err(PrecompileFailure::OutOfGas) => {
                debug!(self.logger, "precompile ran out of gas"; "address" => ?ctx.code_address());
                ctx.consume_all_gas();
                Outcome::OutOfGas
            }
        }
    }

    /// Execute the frame's call if its target is a registered precompile.
    ///
    /// Returns `None` when the address is not a precompile, leaving the call
    /// to the runtime's ordinary handling.
    pub fn execute(&self, ctx: &mut CallContext<'_>) -> Option<Outcome> {
        match self.resolve(ctx.code_address()) {
            Executable::Precompile(precompile) => Some(self.invoke(precompile, ctx)),
            Executable::Bytecode => None,
        }
    }
}

impl<Cfg: Config> Default for Precompiles<Cfg> {
    fn default() -> Self {
        Self::new()
    }
}

/// Construct a revert failure carrying the given reason.
pub fn revert(reason: &str) -> PrecompileFailure {
    PrecompileFailure::Revert {
        output: encode_revert_reason(reason),
    }
}

/// Encode `reason` the way `revert("...")` does: the `Error(string)`
/// selector followed by the ABI-encoded message.
fn encode_revert_reason(reason: &str) -> Vec<u8> {
    [
        ethabi::short_signature("Error", &[ParamType::String]).to_vec(),
        ethabi::encode(&[ethabi::Token::String(reason.to_owned())]),
    ]
    .concat()
}

/// Decode an ABI `Error(string)` revert payload.
pub fn decode_revert_reason(output: &[u8]) -> Option<String> {
    let selector = ethabi::short_signature("Error", &[ParamType::String]);
    if output.len() < 4 || output[..4] != selector {
        return None;
    }
    ethabi::decode(&[ParamType::String], &output[4..])
        .ok()?
        .pop()?
        .into_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        frame::CallContext,
        precompile::testing::call_contract,
        types::{Context, Outcome},
    };

    struct TestConfig;

    impl Config for TestConfig {
        const SACRIFICE_OVERHEAD_GAS: u64 = 10;
    }

    const ECHO_ADDRESS: H160 = H160([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x02, 0x01,
    ]);

    fn call_echo(handle: &mut dyn PrecompileHandle) -> PrecompileResult {
        handle.record_cost(1)?;

        Ok(PrecompileOutput {
            output: handle.input().to_vec(),
        })
    }

    struct EchoConfig;

    impl Config for EchoConfig {
        const SACRIFICE_OVERHEAD_GAS: u64 = 10;

        fn additional_precompiles() -> Option<BTreeMap<H160, PrecompileFn>> {
            Some(BTreeMap::from([
                (ECHO_ADDRESS, call_echo as PrecompileFn),
                // Deliberately shadows the builtin at the reserved address.
                (PRECOMPILE_SACRIFICE, call_echo as PrecompileFn),
            ]))
        }
    }

    #[test]
    fn test_resolve() {
        let precompiles = Precompiles::<TestConfig>::new();
        assert!(matches!(
            precompiles.resolve(PRECOMPILE_SACRIFICE),
            Executable::Precompile(_)
        ));
        assert!(matches!(
            precompiles.resolve(H160::repeat_byte(0x42)),
            Executable::Bytecode
        ));
    }

    #[test]
    fn test_unregistered_address_not_intercepted() {
        let precompiles = Precompiles::<TestConfig>::new();
        let mut ctx = CallContext::new(H160::repeat_byte(0x42), Context::default(), &[], 1_000);
        assert_eq!(precompiles.execute(&mut ctx), None);
        assert_eq!(ctx.gas_used(), 0, "a fallthrough must not touch the frame");
    }

    #[test]
    fn test_additional_precompiles() {
        let input = [0x01, 0x02, 0x03];
        let ret = call_contract::<EchoConfig>(ECHO_ADDRESS, &input, 1_000)
            .expect("additional precompile should be registered");
        assert_eq!(ret, Outcome::Success(input.to_vec()));
    }

    #[test]
    fn test_additional_precompiles_shadow_builtin() {
        let input = [0xaa; 4];
        let ret = call_contract::<EchoConfig>(PRECOMPILE_SACRIFICE, &input, 1_000)
            .expect("shadowed address should still resolve");
        assert_eq!(ret, Outcome::Success(input.to_vec()));
    }

    #[test]
    fn test_revert_reason_roundtrip() {
        match revert("boom") {
            PrecompileFailure::Revert { output } => {
                assert_eq!(decode_revert_reason(&output).as_deref(), Some("boom"));
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_revert_reason_rejects_foreign_payloads() {
        assert_eq!(decode_revert_reason(&[]), None);
        assert_eq!(decode_revert_reason(&[0x01, 0x02, 0x03, 0x04, 0x05]), None);
    }
}
