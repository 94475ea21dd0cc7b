//! C2: the contract storage layer, and the single persistent `ChainStore`
//! value the whole engine snapshots and restores against.

use crate::types::{CodeInfo, ContractInfo};
use cosmwasm_std::Addr;
use im::{HashMap, OrdMap};

/// Per-contract ordered key -> value map. Backed by a persistent map so that
/// cloning a [`ChainStore`] (and therefore this map) is O(1) amortized via
/// structural sharing, never a deep copy.
pub type ContractStorage = OrdMap<Vec<u8>, Vec<u8>>;

/// The entire chain's state as a single value. Snapshotting is
/// `store.clone()`; reverting is reassigning a previously cloned value back
/// into the engine. Because every field is a persistent collection, no
/// mutation after a clone is visible through the clone.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChainStore {
    pub codes: HashMap<u64, CodeInfo>,
    pub contracts: HashMap<Addr, ContractInfo>,
    pub contract_storage: HashMap<Addr, ContractStorage>,
    pub last_code_id: u64,
    pub last_instance_id: u64,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the storage for `addr`, or an empty one if the contract
    /// exists but has never been written to (should not normally diverge
    /// from `contracts.contains_key`, see the data-model invariant in §3).
    pub fn storage_of(&self, addr: &Addr) -> ContractStorage {
        self.contract_storage.get(addr).cloned().unwrap_or_default()
    }

    pub fn set_storage(&mut self, addr: Addr, storage: ContractStorage) {
        self.contract_storage.insert(addr, storage);
    }

    /// Removes `addr`'s storage entry entirely, distinct from `set_storage`
    /// with an empty map: afterwards `storage_of` still returns an empty
    /// map, but the contract retains no row in `contract_storage` at all.
    pub fn delete(&mut self, addr: &Addr) {
        self.contract_storage.remove(addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::derive_contract_address;

    #[test]
    fn clone_is_independent_of_later_mutation() {
        let mut store = ChainStore::new();
        let addr = derive_contract_address(1, 1, "cosmwasm");
        store.set_storage(addr.clone(), OrdMap::unit(b"a".to_vec(), b"1".to_vec()));

        let snapshot = store.clone();

        store.set_storage(addr.clone(), OrdMap::unit(b"a".to_vec(), b"2".to_vec()));

        assert_eq!(
            snapshot.storage_of(&addr).get(&b"a".to_vec()),
            Some(&b"1".to_vec())
        );
        assert_eq!(
            store.storage_of(&addr).get(&b"a".to_vec()),
            Some(&b"2".to_vec())
        );
    }

    #[test]
    fn delete_removes_the_entry_entirely() {
        let mut store = ChainStore::new();
        let addr = derive_contract_address(1, 1, "cosmwasm");
        store.set_storage(addr.clone(), OrdMap::unit(b"a".to_vec(), b"1".to_vec()));
        assert!(store.contract_storage.contains_key(&addr));

        store.delete(&addr);

        assert!(!store.contract_storage.contains_key(&addr));
        assert!(store.storage_of(&addr).is_empty());
    }
}
