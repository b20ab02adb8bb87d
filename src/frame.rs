//! Call frames and the ambient state precompiles execute against.
use crate::{
    precompile::PrecompileFailure,
    types::{Context, H160, U256},
};

/// Execution state a precompile may consult during one invocation.
///
/// Recording a cost is the only mutation a precompile performs through the
/// handle; everything else is read-only.
pub trait PrecompileHandle {
    /// Record the given cost against the frame's remaining budget.
    fn record_cost(&mut self, cost: u64) -> Result<(), PrecompileFailure>;

    /// Gas remaining in the frame.
    fn remaining_gas(&self) -> u64;

    /// Gas offered to the frame.
    fn gas_limit(&self) -> u64;

    /// Raw input bytes of the call.
    fn input(&self) -> &[u8];

    /// Address the call was made to.
    fn code_address(&self) -> H160;

    /// Caller and value information for the frame.
    fn context(&self) -> &Context;

    /// Whether the call executes in read-only (`eth_call` style) mode.
    fn is_static(&self) -> bool;
}

/// A single execution frame.
///
/// Created by the surrounding runtime for the duration of one call. The
/// remaining-gas counter is exclusively owned by the frame; nested frames
/// sub-allocate from their parent via [`CallContext::subcall`] and fold
/// their consumption back via [`CallContext::absorb`].
pub struct CallContext<'a> {
    code_address: H160,
    context: Context,
    input: &'a [u8],
    gas_limit: u64,
    gas_used: u64,
    read_only: bool,
}

impl<'a> CallContext<'a> {
    /// Create a frame for a state-mutating call.
    pub fn new(code_address: H160, context: Context, input: &'a [u8], gas_limit: u64) -> Self {
        Self {
            code_address,
            context,
            input,
            gas_limit,
            gas_used: 0,
            read_only: false,
        }
    }

    /// Create a frame for a read-only call. Runs the identical sequence as a
    /// mutating call; the runtime simply discards the frame without
    /// committing anything.
    pub fn new_static(code_address: H160, context: Context, input: &'a [u8], gas_limit: u64) -> Self {
        Self {
            read_only: true,
            ..Self::new(code_address, context, input, gas_limit)
        }
    }

    /// Gas consumed by the frame so far.
    pub fn gas_used(&self) -> u64 {
        self.gas_used
    }

    /// Consume the frame's entire remaining budget (out-of-gas forfeiture).
    pub fn consume_all_gas(&mut self) {
        self.gas_used = self.gas_limit;
    }

    /// Open a child frame, reserving `gas_limit` from this frame's budget up
    /// front. The unspent part of the reservation is returned by
    /// [`CallContext::absorb`].
    pub fn subcall<'b>(
        &mut self,
        code_address: H160,
        input: &'b [u8],
        gas_limit: u64,
    ) -> Result<CallContext<'b>, PrecompileFailure> {
        self.record_cost(gas_limit)?;

        Ok(CallContext {
            code_address,
            context: Context {
                address: code_address,
                caller: self.context.address,
                apparent_value: U256::zero(),
            },
            input,
            gas_limit,
            gas_used: 0,
            read_only: self.read_only,
        })
    }

    /// Fold a finished child frame back into this one, refunding its unspent
    /// gas. The child's budget was reserved by [`CallContext::subcall`], so
    /// only the refund moves here.
    pub fn absorb(&mut self, child: CallContext<'_>) {
        self.gas_used = self.gas_used.saturating_sub(child.remaining_gas());
    }
}

impl PrecompileHandle for CallContext<'_> {
    fn record_cost(&mut self, cost: u64) -> Result<(), PrecompileFailure> {
        if self.remaining_gas() < cost {
            return Err(PrecompileFailure::OutOfGas);
        }
        self.gas_used = self.gas_used.saturating_add(cost);

        Ok(())
    }

    fn remaining_gas(&self) -> u64 {
        self.gas_limit.saturating_sub(self.gas_used)
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn input(&self) -> &[u8] {
        self.input
    }

    fn code_address(&self) -> H160 {
        self.code_address
    }

    fn context(&self) -> &Context {
        &self.context
    }

    fn is_static(&self) -> bool {
        self.read_only
    }
}
