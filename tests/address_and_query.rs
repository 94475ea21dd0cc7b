//! Coverage for contract address derivation, the `WasmQuery` router, and
//! flat event assembly.

use cosmwasm_std::{to_json_binary, Addr, Empty, Env, MessageInfo, Response, WasmQuery};
use cw_sim_engine::testing::{ContractCode, TestVmLoader};
use cw_sim_engine::{derive_contract_address, CallOutcome, ContractStorage, Engine, EngineConfig};

fn counter_code() -> ContractCode {
    ContractCode::without_reply(
        |_env: Env, _info: MessageInfo, _msg: Vec<u8>, mut storage: ContractStorage| {
            storage.insert(b"count".to_vec(), b"0".to_vec());
            Ok(CallOutcome {
                response: Response::new()
                    .add_attribute("action", "instantiate")
                    .add_event(cosmwasm_std::Event::new("counter_created")),
                storage,
                logs: vec![],
            })
        },
        |_env, _info, _msg, mut storage| {
            storage.insert(b"count".to_vec(), b"1".to_vec());
            Ok(CallOutcome {
                response: Response::new().add_attribute("action", "increment"),
                storage,
                logs: vec![],
            })
        },
        |_env, _msg, _storage| Ok(to_json_binary("ok")?),
    )
}

fn setup() -> (Engine, Addr, Addr) {
    let mut loader = TestVmLoader::new();
    let bytes = loader.register(b"counter-v1".to_vec(), counter_code());
    let engine = Engine::new(Box::new(loader), EngineConfig::default());
    let owner = Addr::unchecked("owner");
    let code_id = engine.create(owner.clone(), bytes);
    engine
        .instantiate_contract(owner.clone(), vec![], code_id, b"{}".to_vec(), None)
        .unwrap();
    let addr = derive_contract_address(code_id, 1, "cosmwasm");
    (engine, owner, addr)
}

#[test]
fn instantiate_derives_a_deterministic_bech32_address() {
    let (_engine, _owner, addr) = setup();
    assert!(addr.as_str().starts_with("cosmwasm1"));

    let again = derive_contract_address(1, 1, "cosmwasm");
    assert_eq!(addr, again, "address derivation is a pure function of (code_id, instance_id)");
}

#[test]
fn execute_assembles_custom_wasm_and_wasm_typed_events() {
    let (engine, owner, addr) = setup();

    let res = engine
        .execute_contract(owner, vec![], addr.clone(), to_json_binary(&Empty {}).unwrap().to_vec(), None)
        .unwrap();

    let custom = res.events.iter().find(|e| e.ty == "execute").unwrap();
    assert!(custom
        .attributes
        .iter()
        .any(|a| a.key == "_contract_address" && a.value == addr.as_str()));

    let wasm = res.events.iter().find(|e| e.ty == "wasm").unwrap();
    assert!(wasm.attributes.iter().any(|a| a.key == "action" && a.value == "increment"));
}

#[test]
fn instantiate_includes_a_wasm_typed_event_for_contract_emitted_events() {
    let mut loader = TestVmLoader::new();
    let bytes = loader.register(b"counter-v1".to_vec(), counter_code());
    let engine = Engine::new(Box::new(loader), EngineConfig::default());
    let owner = Addr::unchecked("owner");
    let code_id = engine.create(owner.clone(), bytes);

    let res = engine
        .instantiate_contract(owner, vec![], code_id, b"{}".to_vec(), None)
        .unwrap();

    assert!(res.events.iter().any(|e| e.ty == "wasm-counter_created"));
}

#[test]
fn smart_query_round_trips_through_the_router() {
    let (engine, _owner, addr) = setup();

    let result = engine
        .handle_query(WasmQuery::Smart {
            contract_addr: addr.to_string(),
            msg: to_json_binary(&Empty {}).unwrap(),
        })
        .unwrap();
    let value: String = cosmwasm_std::from_json(&result).unwrap();
    assert_eq!(value, "ok");
}

#[test]
fn raw_query_returns_the_stored_value() {
    let (engine, _owner, addr) = setup();

    let result = engine
        .handle_query(WasmQuery::Raw {
            contract_addr: addr.to_string(),
            key: b"count".to_vec().into(),
        })
        .unwrap();
    assert_eq!(result.as_slice(), b"0");
}

#[test]
fn raw_query_on_a_missing_key_is_a_reportable_error_not_a_panic() {
    let (engine, _owner, addr) = setup();

    let err = engine
        .handle_query(WasmQuery::Raw {
            contract_addr: addr.to_string(),
            key: b"nonexistent".to_vec().into(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn contract_info_query_reports_the_owning_code_id() {
    let (engine, _owner, addr) = setup();

    let result = engine
        .handle_query(WasmQuery::ContractInfo {
            contract_addr: addr.to_string(),
        })
        .unwrap();
    let info: cosmwasm_std::ContractInfoResponse = cosmwasm_std::from_json(&result).unwrap();
    assert_eq!(info.code_id, 1);
    assert!(info.pinned, "this engine holds every contract resident, so pinned is always true");
}
