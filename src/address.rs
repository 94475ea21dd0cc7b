//! Deterministic contract address derivation.
//!
//! Bit-exact construction:
//!   cid     = be_u64(code_id) || be_u64(instance_id)
//!   mkey    = utf8("wasm") || 0x00
//!   payload = mkey || cid
//!   th      = SHA256("module")
//!   hash    = SHA256(th || payload)
//!   address = bech32(hrp, hash[0..20])

use cosmwasm_std::Addr;
use sha2::{Digest, Sha256};

const MODULE_NAME: &[u8] = b"module";
const NAMESPACE_WASM: &[u8] = b"wasm";

/// Computes the 20-byte contract address hash for `(code_id, instance_id)`.
/// Pure function of its inputs — no I/O, no engine state.
pub fn contract_address_hash(code_id: u64, instance_id: u64) -> [u8; 20] {
    let mut cid = Vec::with_capacity(16);
    cid.extend_from_slice(&code_id.to_be_bytes());
    cid.extend_from_slice(&instance_id.to_be_bytes());

    let mut mkey = NAMESPACE_WASM.to_vec();
    mkey.push(0x00);

    let mut payload = mkey;
    payload.extend_from_slice(&cid);

    let th = Sha256::digest(MODULE_NAME);

    let mut hasher = Sha256::new();
    hasher.update(th);
    hasher.update(&payload);
    let hash = hasher.finalize();

    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[0..20]);
    out
}

/// Derives the bech32-encoded contract [`Addr`] for `(code_id, instance_id)`
/// under the given human-readable prefix.
pub fn derive_contract_address(code_id: u64, instance_id: u64, hrp: &str) -> Addr {
    let hash = contract_address_hash(code_id, instance_id);
    let encoded = bech32::encode(hrp, bech32::ToBase32::to_base32(&hash), bech32::Variant::Bech32)
        .expect("bech32 encoding of a 20-byte address cannot fail");
    Addr::unchecked(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// HRP "cosmwasm", code_id = 1, instance_id = 1.
    #[test]
    fn deterministic_address_matches_reference_construction() {
        let th = Sha256::digest(b"module");
        let mut payload = b"wasm\x00".to_vec();
        payload.extend_from_slice(&1u64.to_be_bytes());
        payload.extend_from_slice(&1u64.to_be_bytes());
        let mut hasher = Sha256::new();
        hasher.update(th);
        hasher.update(&payload);
        let expected_hash = hasher.finalize();

        let hash = contract_address_hash(1, 1);
        assert_eq!(&hash[..], &expected_hash[0..20]);

        let addr = derive_contract_address(1, 1, "cosmwasm");
        assert!(addr.as_str().starts_with("cosmwasm1"));
    }

    #[test]
    fn address_is_a_pure_function_of_its_inputs() {
        let a = derive_contract_address(4, 7, "cosmwasm");
        let b = derive_contract_address(4, 7, "cosmwasm");
        assert_eq!(a, b);

        let c = derive_contract_address(4, 8, "cosmwasm");
        assert_ne!(a, c);
    }

    #[test]
    fn different_hrp_changes_only_the_encoding() {
        let a = derive_contract_address(1, 1, "cosmwasm");
        let b = derive_contract_address(1, 1, "osmo");
        assert_ne!(a, b);
        assert!(b.as_str().starts_with("osmo1"));
    }
}
