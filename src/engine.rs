//! C1 (code & instance registry) plus the `Engine` type that every other
//! component hangs off of.

use crate::address::derive_contract_address;
use crate::contracts::VmLoader;
use crate::router::{ExternalRouter, FailingExternalRouter};
use crate::store::ChainStore;
use crate::types::CodeInfo;
use crate::vm_host::VmHost;
use cosmwasm_std::{Addr, BlockInfo, Timestamp};
use std::cell::RefCell;

/// Host-supplied parameters that do not change the engine's invariants, only
/// its presentation: the bech32 human-readable prefix used for contract
/// addresses, the reported chain id, and the starting block. There is no
/// config-file or environment-variable loading here — that belongs to a
/// CLI, which is out of scope for this crate.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub bech32_prefix: String,
    pub chain_id: String,
    pub starting_block: BlockInfo,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bech32_prefix: "cosmwasm".to_string(),
            chain_id: "cosmwasm-sim".to_string(),
            starting_block: BlockInfo {
                height: 1,
                time: Timestamp::from_seconds(1_571_797_419),
                chain_id: "cosmwasm-sim".to_string(),
            },
        }
    }
}

/// The whole engine: chain state, VM host, external-module router, and the
/// host-supplied config. Every public method an external host calls is a
/// method on this type.
pub struct Engine {
    pub(crate) store: RefCell<ChainStore>,
    pub(crate) vm_host: VmHost,
    pub(crate) external_router: Box<dyn ExternalRouter>,
    pub(crate) config: EngineConfig,
    pub(crate) block: RefCell<BlockInfo>,
}

impl Engine {
    pub fn new(vm_loader: Box<dyn VmLoader>, config: EngineConfig) -> Self {
        let block = config.starting_block.clone();
        Self {
            store: RefCell::new(ChainStore::new()),
            vm_host: VmHost::new(vm_loader),
            external_router: Box::new(FailingExternalRouter),
            config,
            block: RefCell::new(block),
        }
    }

    pub fn with_external_router(mut self, router: Box<dyn ExternalRouter>) -> Self {
        self.external_router = router;
        self
    }

    /// Advances the host-supplied chain clock. The engine never calls this
    /// itself: block production is explicitly out of scope.
    pub fn set_block(&self, block: BlockInfo) {
        *self.block.borrow_mut() = block;
    }

    pub fn block_info(&self) -> BlockInfo {
        self.block.borrow().clone()
    }

    /// A read-only snapshot of the current chain store, e.g. for test
    /// assertions. Cheap: `ChainStore` is a persistent value.
    pub fn store_snapshot(&self) -> ChainStore {
        self.store.borrow().clone()
    }

    pub fn evict(&self, addr: &Addr) {
        self.vm_host.evict(addr)
    }

    /// C1: uploads bytecode, returning its assigned code id. No validation
    /// beyond what the VM loader later performs at instantiation time.
    pub fn create(&self, creator: Addr, wasm_code: Vec<u8>) -> u64 {
        let mut store = self.store.borrow_mut();
        let code_id = store.last_code_id + 1;
        store.codes.insert(code_id, CodeInfo { creator, wasm_code });
        store.last_code_id = code_id;
        log::debug!("engine: stored code id {code_id}");
        code_id
    }

    /// C1: registers a new contract instance for `code_id`, computing its
    /// deterministic address, and writes its initial
    /// `ContractInfo` plus an empty storage map. Does not call the VM —
    /// callers still need to invoke `instantiate` on the result.
    pub(crate) fn register_contract_instance(&self, sender: Addr, code_id: u64) -> Addr {
        let mut store = self.store.borrow_mut();
        let instance_id = store.last_instance_id + 1;
        let addr = derive_contract_address(code_id, instance_id, &self.config.bech32_prefix);

        let height = self.block.borrow().height;
        store.contracts.insert(
            addr.clone(),
            crate::types::ContractInfo {
                code_id,
                creator: sender,
                admin: None,
                label: String::new(),
                created: height,
            },
        );
        store.contract_storage.insert(addr.clone(), Default::default());
        store.last_instance_id = instance_id;
        log::debug!("engine: registered contract {addr} for code id {code_id}");
        addr
    }
}
