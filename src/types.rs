use cosmwasm_std::{Addr, Binary, Event};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Compiled contract bytecode, as uploaded via [`crate::engine::Engine::create`].
/// Immutable once stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct CodeInfo {
    pub creator: Addr,
    #[schemars(with = "String")]
    pub wasm_code: Vec<u8>,
}

/// Metadata for a single contract instance, analogous to `ContractInfo` in
/// the wasmd/CosmWasm data model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ContractInfo {
    pub code_id: u64,
    pub creator: Addr,
    pub admin: Option<Addr>,
    pub label: String,
    pub created: u64,
}

/// A single log line reported by the VM for a call. The engine does not
/// interpret these; it only collects and threads them into the trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DebugLog(pub String);

impl DebugLog {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// The engine's application-level response to any of the four entry points:
/// a flat, ordered event list (custom event + `wasm` + `wasm-<type>` events,
/// see [`crate::orchestrator::build_app_response`]) plus an optional opaque
/// data payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AppResponse {
    pub events: Vec<Event>,
    pub data: Option<Binary>,
}
