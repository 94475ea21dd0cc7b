//! The VM abstraction the engine consumes. The bytecode VM itself
//! — loader, linker, gas metering, host-function bindings — is out of
//! scope; this module only specifies the seam.

use crate::error::AnyResult;
use crate::store::ContractStorage;
use crate::types::DebugLog;
use cosmwasm_std::{Binary, Empty, Env, MessageInfo, Reply, Response};

/// Everything a VM entry point call reports back to the engine: the
/// contract's declared response, the resulting storage (a full replacement
/// value — storage is persistent, so "mutating" really means "returning a
/// new map"), and any debug log lines emitted during the call.
pub struct CallOutcome {
    pub response: Response<Empty>,
    pub storage: ContractStorage,
    pub logs: Vec<DebugLog>,
}

/// One running VM instance, bound to a single contract address. Constructed
/// by a [`VmLoader`] and cached by [`crate::vm_host`].
pub trait Contract {
    fn instantiate(
        &mut self,
        env: Env,
        info: MessageInfo,
        msg: Vec<u8>,
        storage: ContractStorage,
    ) -> AnyResult<CallOutcome>;

    fn execute(
        &mut self,
        env: Env,
        info: MessageInfo,
        msg: Vec<u8>,
        storage: ContractStorage,
    ) -> AnyResult<CallOutcome>;

    fn reply(
        &mut self,
        env: Env,
        reply: Reply,
        storage: ContractStorage,
    ) -> AnyResult<CallOutcome>;

    fn query(&mut self, env: Env, msg: Vec<u8>, storage: ContractStorage) -> AnyResult<Binary>;
}

/// Builds a fresh [`Contract`] instance from stored bytecode. This is the
/// only point at which the out-of-scope bytecode VM does real linking or
/// compilation work; a real VM may need this step to suspend on I/O-like work,
/// but since the VM itself owns any such asynchrony, this trait stays
/// synchronous.
pub trait VmLoader {
    fn load(&self, wasm_code: &[u8]) -> AnyResult<Box<dyn Contract>>;
}
