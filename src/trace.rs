//! C6: the trace recorder. A hierarchical, not flattened, audit record of
//! every VM entry-point invocation.

use crate::store::ChainStore;
use crate::types::{AppResponse, DebugLog};
use cosmwasm_std::{Empty, Env, MessageInfo, Response};
use serde::Serialize;

/// One call-frame record. `query` never produces one of these: it is
/// stateless and unrecorded.
#[derive(Clone, Debug, Serialize)]
pub enum TraceEntry {
    Instantiate(CallTrace),
    Execute(CallTrace),
    Reply(CallTrace),
}

/// Common fields shared by every traced entry point.
#[derive(Clone, Debug, Serialize)]
pub struct CallTrace {
    pub contract_address: cosmwasm_std::Addr,
    #[serde(with = "binary_as_base64")]
    pub msg: Vec<u8>,
    pub env: Env,
    pub info: Option<MessageInfo>,
    /// The VM's raw reported response, absent if the VM call itself errored.
    pub response: Option<Response<Empty>>,
    pub logs: Vec<DebugLog>,
    /// The chain store as it stood once this call settled: post-revert on
    /// failure, post-success on success.
    pub store_snapshot: ChainStore,
    pub result: Result<AppResponse, String>,
    /// Sub-trace from submessages emitted by this call, in emission order.
    /// Empty if none were emitted, never flattened into the parent list.
    pub trace: Vec<TraceEntry>,
}

mod binary_as_base64 {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&cosmwasm_std::Binary::from(bytes).to_base64())
    }
}

/// Appends `entry` to `trace` if the caller asked for tracing at all.
/// Centralizes the `Option<&mut Vec<_>>` plumbing used by every C4 entry
/// point so call sites stay readable.
pub fn record(trace: Option<&mut Vec<TraceEntry>>, entry: TraceEntry) {
    if let Some(trace) = trace {
        trace.push(entry);
    }
}
