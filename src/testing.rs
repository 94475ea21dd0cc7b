//! Ambient test tooling: a closure-based [`Contract`]/[`VmLoader`] pair for
//! exercising the engine without wiring up a real bytecode VM, in the same
//! spirit as the stub accepting/failing implementations in
//! [`crate::router`] for external modules a test doesn't care about.

use crate::contracts::{CallOutcome, Contract, VmLoader};
use crate::error::AnyResult;
use crate::store::ContractStorage;
use anyhow::bail;
use cosmwasm_std::{Binary, Empty, Env, MessageInfo, Reply, Response};
use std::collections::HashMap;
use std::rc::Rc;

type InstantiateFn = dyn Fn(Env, MessageInfo, Vec<u8>, ContractStorage) -> AnyResult<CallOutcome>;
type ExecuteFn = dyn Fn(Env, MessageInfo, Vec<u8>, ContractStorage) -> AnyResult<CallOutcome>;
type ReplyFn = dyn Fn(Env, Reply, ContractStorage) -> AnyResult<CallOutcome>;
type QueryFn = dyn Fn(Env, Vec<u8>, ContractStorage) -> AnyResult<Binary>;

/// A contract's behavior, expressed as plain closures instead of compiled
/// bytecode. Cloning is cheap (`Rc`): every instantiated contract instance
/// sharing a `ContractCode` runs the same closures.
#[derive(Clone)]
pub struct ContractCode {
    instantiate: Rc<InstantiateFn>,
    execute: Rc<ExecuteFn>,
    reply: Rc<ReplyFn>,
    query: Rc<QueryFn>,
}

impl ContractCode {
    pub fn new(
        instantiate: impl Fn(Env, MessageInfo, Vec<u8>, ContractStorage) -> AnyResult<CallOutcome>
            + 'static,
        execute: impl Fn(Env, MessageInfo, Vec<u8>, ContractStorage) -> AnyResult<CallOutcome>
            + 'static,
        reply: impl Fn(Env, Reply, ContractStorage) -> AnyResult<CallOutcome> + 'static,
        query: impl Fn(Env, Vec<u8>, ContractStorage) -> AnyResult<Binary> + 'static,
    ) -> Self {
        Self {
            instantiate: Rc::new(instantiate),
            execute: Rc::new(execute),
            reply: Rc::new(reply),
            query: Rc::new(query),
        }
    }

    /// A contract whose `reply` is never expected to be called: useful for
    /// everything but the few fixtures that exercise the submessage
    /// reply-on matrix directly.
    pub fn without_reply(
        instantiate: impl Fn(Env, MessageInfo, Vec<u8>, ContractStorage) -> AnyResult<CallOutcome>
            + 'static,
        execute: impl Fn(Env, MessageInfo, Vec<u8>, ContractStorage) -> AnyResult<CallOutcome>
            + 'static,
        query: impl Fn(Env, Vec<u8>, ContractStorage) -> AnyResult<Binary> + 'static,
    ) -> Self {
        Self::new(
            instantiate,
            execute,
            |_, _, _| bail!("this contract fixture does not implement reply"),
            query,
        )
    }
}

impl Contract for ContractCode {
    fn instantiate(
        &mut self,
        env: Env,
        info: MessageInfo,
        msg: Vec<u8>,
        storage: ContractStorage,
    ) -> AnyResult<CallOutcome> {
        (self.instantiate)(env, info, msg, storage)
    }

    fn execute(
        &mut self,
        env: Env,
        info: MessageInfo,
        msg: Vec<u8>,
        storage: ContractStorage,
    ) -> AnyResult<CallOutcome> {
        (self.execute)(env, info, msg, storage)
    }

    fn reply(
        &mut self,
        env: Env,
        reply: Reply,
        storage: ContractStorage,
    ) -> AnyResult<CallOutcome> {
        (self.reply)(env, reply, storage)
    }

    fn query(&mut self, env: Env, msg: Vec<u8>, storage: ContractStorage) -> AnyResult<Binary> {
        (self.query)(env, msg, storage)
    }
}

/// A [`VmLoader`] backed by an in-memory registry keyed by the exact bytes
/// passed to [`crate::engine::Engine::create`]. Tests register one
/// `ContractCode` per logical contract and use its registration key as the
/// "wasm_code" blob — real bytecode identity plays the same role in the
/// real VM this trait stands in for.
#[derive(Default)]
pub struct TestVmLoader {
    codes: HashMap<Vec<u8>, ContractCode>,
}

impl TestVmLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `code` under `key` and returns `key` unchanged, so it can
    /// be passed directly to `Engine::create` and chained inline.
    pub fn register(&mut self, key: impl Into<Vec<u8>>, code: ContractCode) -> Vec<u8> {
        let key = key.into();
        self.codes.insert(key.clone(), code);
        key
    }
}

impl VmLoader for TestVmLoader {
    fn load(&self, wasm_code: &[u8]) -> AnyResult<Box<dyn Contract>> {
        match self.codes.get(wasm_code) {
            Some(code) => Ok(Box::new(code.clone())),
            None => bail!("no ContractCode registered for this code id's bytes"),
        }
    }
}
