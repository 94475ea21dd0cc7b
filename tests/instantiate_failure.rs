//! A failing `instantiate` must leave no trace in the chain store: no
//! `ContractInfo`, no storage entry, and the instance counter must not be
//! burned.

use cosmwasm_std::{to_json_binary, Env, MessageInfo, Response};
use cw_sim_engine::testing::{ContractCode, TestVmLoader};
use cw_sim_engine::{derive_contract_address, CallOutcome, ContractStorage, Engine, EngineConfig};

fn always_fails_code() -> ContractCode {
    ContractCode::without_reply(
        |_env: Env, _info: MessageInfo, _msg: Vec<u8>, _storage: ContractStorage| {
            anyhow::bail!("instantiation refused")
        },
        |_env, _info, _msg, storage| {
            Ok(CallOutcome {
                response: Response::new(),
                storage,
                logs: vec![],
            })
        },
        |_env, _msg, _storage| Ok(to_json_binary("ok")?),
    )
}

#[test]
fn failed_instantiate_registers_no_contract_and_burns_no_instance_id() {
    let mut loader = TestVmLoader::new();
    let bytes = loader.register(b"refuser-v1".to_vec(), always_fails_code());
    let engine = Engine::new(Box::new(loader), EngineConfig::default());
    let owner = cosmwasm_std::Addr::unchecked("owner");
    let code_id = engine.create(owner.clone(), bytes);

    let before = engine.store_snapshot();
    let result = engine.instantiate_contract(owner.clone(), vec![], code_id, b"{}".to_vec(), None);
    assert!(result.is_err());

    let after = engine.store_snapshot();
    assert_eq!(before, after, "a failed instantiate must not change the chain store at all");

    let would_be_addr = derive_contract_address(code_id, 1, "cosmwasm");
    assert!(!after.contracts.contains_key(&would_be_addr));

    // a second, successful instantiate still gets instance id 1: the failed
    // attempt above did not burn it.
    let mut loader = TestVmLoader::new();
    let working_bytes = loader.register(
        b"worker-v1".to_vec(),
        ContractCode::without_reply(
            |_env, _info, _msg, storage| {
                Ok(CallOutcome {
                    response: Response::new(),
                    storage,
                    logs: vec![],
                })
            },
            |_env, _info, _msg, storage| {
                Ok(CallOutcome {
                    response: Response::new(),
                    storage,
                    logs: vec![],
                })
            },
            |_env, _msg, _storage| Ok(to_json_binary("ok")?),
        ),
    );
    let engine2 = Engine::new(Box::new(loader), EngineConfig::default());
    let code_id2 = engine2.create(owner.clone(), working_bytes);
    let addr2 = engine2
        .instantiate_contract(owner, vec![], code_id2, b"{}".to_vec(), None)
        .map(|_| derive_contract_address(code_id2, 1, "cosmwasm"))
        .unwrap();
    assert!(addr2.as_str().starts_with("cosmwasm1"));
}
