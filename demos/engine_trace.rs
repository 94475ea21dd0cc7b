//! Drives a small scenario through the engine with `log` output enabled, so
//! `RUST_LOG=debug cargo run --example engine_trace` shows code/contract
//! registration, VM cache hits/misses, and submessage dispatch as they
//! happen, without needing to inspect the structured `TraceEntry` tree.

use cosmwasm_std::{to_json_binary, Addr, Response};
use cw_sim_engine::testing::{ContractCode, TestVmLoader};
use cw_sim_engine::{CallOutcome, Engine, EngineConfig};

fn counter_code() -> ContractCode {
    ContractCode::without_reply(
        |_env, _info, _msg, mut storage| {
            storage.insert(b"count".to_vec(), b"0".to_vec());
            Ok(CallOutcome {
                response: Response::new().add_attribute("action", "instantiate"),
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

pub fn main() {
    run().unwrap()
}

fn run() -> anyhow::Result<()> {
    env_logger::init();

    let mut loader = TestVmLoader::new();
    let code_bytes = loader.register(b"counter-v1".to_vec(), counter_code());
    let engine = Engine::new(Box::new(loader), EngineConfig::default());
    let owner = Addr::unchecked("owner");

    let code_id = engine.create(owner.clone(), code_bytes);
    let res = engine.instantiate_contract(owner.clone(), vec![], code_id, b"{}".to_vec(), None)?;
    println!("instantiate events: {:?}", res.events);

    let addr = cw_sim_engine::derive_contract_address(code_id, 1, "cosmwasm");
    engine.evict(&addr); // force a cold cache miss on the next call
    let res = engine.execute_contract(owner, vec![], addr, b"{}".to_vec(), None)?;
    println!("execute events: {:?}", res.events);

    Ok(())
}
