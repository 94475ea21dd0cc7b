//! C4: the execution orchestrator. Drives instantiate/execute/reply/query,
//! synthesizes the environment and the custom/`wasm`/`wasm-<t>` event
//! layers, and hands submessages off to C5.

use crate::contracts::CallOutcome;
use crate::engine::Engine;
use crate::error::{AnyContext, AnyResult, Error};
use crate::trace::{record, CallTrace, TraceEntry};
use crate::types::AppResponse;
use cosmwasm_std::{
    Addr, Attribute, Binary, Coin, ContractInfoResponse, Empty, Env, Event, MessageInfo, Reply,
    WasmQuery,
};

const CONTRACT_ATTR: &str = "_contract_address";

impl Engine {
    pub(crate) fn env_for(&self, address: &Addr) -> Env {
        Env {
            block: self.block_info(),
            contract: cosmwasm_std::ContractInfo {
                address: address.clone(),
            },
            transaction: None,
        }
    }

    pub fn instantiate_contract(
        &self,
        sender: Addr,
        funds: Vec<Coin>,
        code_id: u64,
        msg: Vec<u8>,
        mut trace: Option<&mut Vec<TraceEntry>>,
    ) -> AnyResult<AppResponse> {
        let snapshot = self.store_snapshot();
        let addr = self.register_contract_instance(sender.clone(), code_id);
        let env = self.env_for(&addr);
        let info = MessageInfo {
            sender,
            funds,
        };
        let storage_in = self.store.borrow().storage_of(&addr);

        let call_result = self
            .vm_host
            .with_vm(&self.store.borrow(), &addr, |vm| {
                vm.instantiate(env.clone(), info.clone(), msg.clone(), storage_in)
            });

        match call_result {
            Err(e) => {
                // revert: undo the registration we just made, restore the
                // whole snapshot (the counter decrement is redundant with
                // the snapshot restore, since both counters live inside
                // ChainStore -- see SPEC_FULL.md open-question resolution).
                *self.store.borrow_mut() = snapshot.clone();
                let result = Err(e.to_string());
                record(
                    trace.as_deref_mut(),
                    TraceEntry::Instantiate(CallTrace {
                        contract_address: addr,
                        msg: msg.clone(),
                        env,
                        info: Some(info),
                        response: None,
                        logs: vec![],
                        store_snapshot: self.store_snapshot(),
                        result: result.clone(),
                        trace: vec![],
                    }),
                );
                anyhow::bail!(result.unwrap_err())
            }
            Ok(CallOutcome {
                response,
                storage,
                logs,
            }) => {
                self.store.borrow_mut().set_storage(addr.clone(), storage);

                let custom_event = Event::new("instantiate")
                    .add_attribute(CONTRACT_ATTR, &addr)
                    .add_attribute("code_id", code_id.to_string());

                let (app, submessages) =
                    build_app_response(&addr, custom_event, response.clone());

                let mut sub_trace = Vec::new();
                let outcome =
                    self.handle_contract_response(&addr, submessages, app, Some(&mut sub_trace));

                let result = outcome
                    .as_ref()
                    .map(|r| r.clone())
                    .map_err(|e| e.to_string());
                record(
                    trace.as_deref_mut(),
                    TraceEntry::Instantiate(CallTrace {
                        contract_address: addr,
                        msg,
                        env,
                        info: Some(info),
                        response: Some(response),
                        logs,
                        store_snapshot: self.store_snapshot(),
                        result,
                        trace: sub_trace,
                    }),
                );
                outcome
            }
        }
    }

    pub fn execute_contract(
        &self,
        sender: Addr,
        funds: Vec<Coin>,
        addr: Addr,
        msg: Vec<u8>,
        mut trace: Option<&mut Vec<TraceEntry>>,
    ) -> AnyResult<AppResponse> {
        let snapshot = self.store_snapshot();
        let env = self.env_for(&addr);
        let info = MessageInfo {
            sender,
            funds,
        };
        let storage_in = self.store.borrow().storage_of(&addr);

        let call_result = self
            .vm_host
            .with_vm(&self.store.borrow(), &addr, |vm| {
                vm.execute(env.clone(), info.clone(), msg.clone(), storage_in)
            });

        match call_result {
            Err(e) => {
                *self.store.borrow_mut() = snapshot;
                let result = Err(e.to_string());
                record(
                    trace.as_deref_mut(),
                    TraceEntry::Execute(CallTrace {
                        contract_address: addr,
                        msg: msg.clone(),
                        env,
                        info: Some(info),
                        response: None,
                        logs: vec![],
                        store_snapshot: self.store_snapshot(),
                        result: result.clone(),
                        trace: vec![],
                    }),
                );
                anyhow::bail!(result.unwrap_err())
            }
            Ok(CallOutcome {
                response,
                storage,
                logs,
            }) => {
                self.store.borrow_mut().set_storage(addr.clone(), storage);

                let custom_event =
                    Event::new("execute").add_attribute(CONTRACT_ATTR, &addr);

                let (app, submessages) =
                    build_app_response(&addr, custom_event, response.clone());

                let mut sub_trace = Vec::new();
                let outcome =
                    self.handle_contract_response(&addr, submessages, app, Some(&mut sub_trace));

                let result = outcome
                    .as_ref()
                    .map(|r| r.clone())
                    .map_err(|e| e.to_string());
                record(
                    trace.as_deref_mut(),
                    TraceEntry::Execute(CallTrace {
                        contract_address: addr,
                        msg,
                        env,
                        info: Some(info),
                        response: Some(response),
                        logs,
                        store_snapshot: self.store_snapshot(),
                        result,
                        trace: sub_trace,
                    }),
                );
                outcome
            }
        }
    }

    pub(crate) fn reply(
        &self,
        addr: &Addr,
        reply_msg: Reply,
        mut trace: Option<&mut Vec<TraceEntry>>,
    ) -> AnyResult<AppResponse> {
        let snapshot = self.store_snapshot();
        let env = self.env_for(addr);
        let storage_in = self.store.borrow().storage_of(addr);
        let is_ok = reply_msg.result.is_ok();

        let call_result = self
            .vm_host
            .with_vm(&self.store.borrow(), addr, |vm| {
                vm.reply(env.clone(), reply_msg.clone(), storage_in)
            });

        match call_result {
            Err(e) => {
                *self.store.borrow_mut() = snapshot;
                let result = Err(e.to_string());
                record(
                    trace.as_deref_mut(),
                    TraceEntry::Reply(CallTrace {
                        contract_address: addr.clone(),
                        msg: serde_json::to_vec(&reply_msg).unwrap_or_default(),
                        env,
                        info: None,
                        response: None,
                        logs: vec![],
                        store_snapshot: self.store_snapshot(),
                        result: result.clone(),
                        trace: vec![],
                    }),
                );
                anyhow::bail!(result.unwrap_err())
            }
            Ok(CallOutcome {
                response,
                storage,
                logs,
            }) => {
                self.store.borrow_mut().set_storage(addr.clone(), storage);

                let mode = if is_ok { "handle_success" } else { "handle_failure" };
                let custom_event = Event::new("reply")
                    .add_attribute(CONTRACT_ATTR, addr)
                    .add_attribute("mode", mode);

                let (app, submessages) =
                    build_app_response(addr, custom_event, response.clone());

                let mut sub_trace = Vec::new();
                let outcome =
                    self.handle_contract_response(addr, submessages, app, Some(&mut sub_trace));

                let result = outcome
                    .as_ref()
                    .map(|r| r.clone())
                    .map_err(|e| e.to_string());
                record(
                    trace.as_deref_mut(),
                    TraceEntry::Reply(CallTrace {
                        contract_address: addr.clone(),
                        msg: serde_json::to_vec(&reply_msg).unwrap_or_default(),
                        env,
                        info: None,
                        response: Some(response),
                        logs,
                        store_snapshot: self.store_snapshot(),
                        result,
                        trace: sub_trace,
                    }),
                );
                outcome
            }
        }
    }

    /// Stateless; never snapshots, never mutates storage, never traced.
    pub fn query(&self, addr: &Addr, msg: Vec<u8>) -> AnyResult<Binary> {
        let env = self.env_for(addr);
        let storage = self.store.borrow().storage_of(addr);
        self.vm_host
            .with_vm(&self.store.borrow(), addr, |vm| vm.query(env.clone(), msg.clone(), storage))
    }

    /// C4 query router: dispatches the three `WasmQuery` variants a
    /// host can issue against this engine directly, without going through a
    /// contract's own `execute`/`instantiate`. Every other `WasmQuery`
    /// variant (e.g. `CodeInfo`) is out of scope and rejected as a plain
    /// error, since it is host input rather than a structural invariant.
    pub fn handle_query(&self, query: WasmQuery) -> AnyResult<Binary> {
        match query {
            WasmQuery::Smart { contract_addr, msg } => {
                self.query(&Addr::unchecked(contract_addr), msg.to_vec())
            }
            WasmQuery::Raw { contract_addr, key } => {
                let addr = Addr::unchecked(contract_addr);
                let storage = self.store.borrow().storage_of(&addr);
                let value = storage.get(&key.to_vec()).cloned().ok_or_else(|| {
                    Error::KeyNotFound(String::from_utf8_lossy(key.as_slice()).into_owned())
                })?;
                Ok(Binary::from(value))
            }
            WasmQuery::ContractInfo { contract_addr } => {
                let addr = Addr::unchecked(contract_addr);
                let store = self.store.borrow();
                let info = store
                    .contracts
                    .get(&addr)
                    .ok_or_else(|| Error::ContractNotFound(addr.clone()))?;
                let response = ContractInfoResponse::new(
                    info.code_id,
                    info.creator.to_string(),
                    info.admin.as_ref().map(Addr::to_string),
                    true,
                    None,
                );
                cosmwasm_std::to_json_binary(&response).context("encoding ContractInfoResponse")
            }
            other => Err(Error::UnsupportedWasmQuery(other).into()),
        }
    }
}

/// Folds the VM's raw `Response` into the engine's flat event list: the
/// custom event first, then a `wasm` event aggregating the
/// contract's own attributes (only if non-empty), then one `wasm-<type>`
/// event per contract-emitted event, each carrying the contract address as
/// its first attribute. Returns the partially-built `AppResponse` (data
/// passed through unchanged) plus the submessages still to be dispatched.
pub(crate) fn build_app_response(
    contract: &Addr,
    custom_event: Event,
    response: cosmwasm_std::Response<Empty>,
) -> (AppResponse, Vec<cosmwasm_std::SubMsg<Empty>>) {
    let cosmwasm_std::Response {
        messages,
        attributes,
        events,
        data,
        ..
    } = response;

    let mut app_events = Vec::with_capacity(2 + events.len());
    app_events.push(custom_event);

    if !attributes.is_empty() {
        let wasm_event = Event::new("wasm")
            .add_attribute(CONTRACT_ATTR, contract)
            .add_attributes(attributes);
        app_events.push(wasm_event);
    }

    let wasm_events = events.into_iter().map(|mut ev| {
        ev.ty = format!("wasm-{}", ev.ty);
        ev.attributes
            .insert(0, Attribute::new(CONTRACT_ATTR, contract.as_str()));
        ev
    });
    app_events.extend(wasm_events);

    (
        AppResponse {
            events: app_events,
            data,
        },
        messages,
    )
}
