use cosmwasm_std::{Addr, WasmQuery};

pub use anyhow::{bail, Context as AnyContext};

/// Error type used across the engine for recoverable, reportable failures:
/// VM-reported contract errors, bad user input, and the small set of named
/// conditions below. See [`crate::error`] module docs for the distinction
/// between this and the structural-invariant panics raised by `expect_*`
/// helpers in [`crate::engine`].
pub type AnyError = anyhow::Error;
pub type AnyResult<T> = anyhow::Result<T>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("code id: invalid")]
    InvalidCodeId,

    #[error("Contract {0} not found")]
    ContractNotFound(Addr),

    #[error("Key {0} not found")]
    KeyNotFound(String),

    #[error("unsupported wasm query: {0:?}")]
    UnsupportedWasmQuery(WasmQuery),
}
