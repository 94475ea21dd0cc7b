//! An in-process execution engine for CosmWasm-style smart contracts: given
//! compiled bytecode and a VM backend to run it, this crate drives
//! instantiate/execute/reply/query, derives deterministic contract
//! addresses, and replays the submessage reply-on state machine against a
//! single persistent chain store.
//!
//! The bytecode VM itself is not part of this crate — see
//! [`contracts::VmLoader`] and [`contracts::Contract`] for the seam a host
//! implements to plug one in. [`testing::ContractCode`] provides a minimal
//! in-memory `VmLoader`/`Contract` pair, built from plain closures, for
//! exercising the engine without a real VM.

mod address;
mod contracts;
mod engine;
mod error;
mod orchestrator;
mod router;
mod store;
mod submsg;
mod trace;
mod types;
mod vm_host;

pub mod testing;

pub use address::{contract_address_hash, derive_contract_address};
pub use contracts::{CallOutcome, Contract, VmLoader};
pub use engine::{Engine, EngineConfig};
pub use error::{AnyError, AnyResult, Error};
pub use router::{AcceptingExternalRouter, ExternalRouter, FailingExternalRouter};
pub use store::{ChainStore, ContractStorage};
pub use trace::{CallTrace, TraceEntry};
pub use types::{AppResponse, CodeInfo, ContractInfo, DebugLog};
