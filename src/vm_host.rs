//! C3: VM Host / Backend. Builds and caches one VM instance per contract
//! address. The cache is best-effort: the authoritative state
//! always lives in [`crate::store::ChainStore`], so eviction never changes
//! engine semantics.

use crate::contracts::{Contract, VmLoader};
use crate::error::AnyResult;
use crate::store::ChainStore;
use cosmwasm_std::Addr;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct VmHost {
    loader: Box<dyn VmLoader>,
    cache: RefCell<HashMap<Addr, Box<dyn Contract>>>,
}

impl VmHost {
    pub fn new(loader: Box<dyn VmLoader>) -> Self {
        Self {
            loader,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Drops a cached VM instance for `addr`, if any. Always safe: the next
    /// call against `addr` re-seeds a fresh instance from `ChainStore`.
    pub fn evict(&self, addr: &Addr) {
        self.cache.borrow_mut().remove(addr);
    }

    /// Runs `f` against the cached (or freshly built) VM instance for
    /// `addr`. `store` provides the `CodeInfo` needed to build the instance
    /// on a cache miss; building never touches contract storage directly —
    /// that is threaded through the `Contract` trait's call methods.
    pub fn with_vm<F, T>(&self, store: &ChainStore, addr: &Addr, f: F) -> AnyResult<T>
    where
        F: FnOnce(&mut dyn Contract) -> AnyResult<T>,
    {
        let mut cache = self.cache.borrow_mut();
        if !cache.contains_key(addr) {
            let contract_info = store
                .contracts
                .get(addr)
                .unwrap_or_else(|| panic!("invariant violation: VM host asked to build a VM for {addr}, but no ContractInfo exists for it"));
            let code_info = store.codes.get(&contract_info.code_id).unwrap_or_else(|| {
                panic!(
                    "invariant violation: contract {addr} references code id {} which is not in the registry",
                    contract_info.code_id
                )
            });
            log::debug!("vm_host: cold cache miss for {addr}, building instance");
            let instance = self.loader.load(&code_info.wasm_code)?;
            cache.insert(addr.clone(), instance);
        } else {
            log::trace!("vm_host: cache hit for {addr}");
        }

        let instance = cache.get_mut(addr).expect("just inserted or already present");
        f(instance.as_mut())
    }
}
