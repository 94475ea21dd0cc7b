//! C5: the submessage state machine — the heart of the engine.
//! Also hosts the top-level message router (`handle_msg`), since submessage
//! dispatch re-enters it recursively.

use crate::engine::Engine;
use crate::error::AnyResult;
use crate::trace::TraceEntry;
use crate::types::AppResponse;
use cosmwasm_std::{
    Addr, CosmosMsg, Empty, Reply, ReplyOn, SubMsg, SubMsgResponse, SubMsgResult, WasmMsg,
};

impl Engine {
    /// Router entry point: `Wasm(_)` messages are handled inline
    /// by the engine itself; everything else is delegated to the
    /// host-supplied [`crate::router::ExternalRouter`].
    pub fn handle_msg(
        &self,
        sender: Addr,
        msg: CosmosMsg<Empty>,
        trace: Option<&mut Vec<TraceEntry>>,
    ) -> AnyResult<AppResponse> {
        match msg {
            CosmosMsg::Wasm(wasm_msg) => match wasm_msg {
                WasmMsg::Execute {
                    contract_addr,
                    msg,
                    funds,
                } => self.execute_contract(
                    sender,
                    funds,
                    Addr::unchecked(contract_addr),
                    msg.to_vec(),
                    trace,
                ),
                WasmMsg::Instantiate {
                    code_id, msg, funds, ..
                } => self.instantiate_contract(sender, funds, code_id, msg.to_vec(), trace),
                other => panic!(
                    "invariant violation: unsupported WasmMsg variant reached the router: {other:?}"
                ),
            },
            other => self.external_router.handle(&sender, other),
        }
    }

    /// C5 orchestration loop: revert ALL prior siblings' effects if any
    /// submessage fails, not only the failing one.
    pub(crate) fn handle_contract_response(
        &self,
        addr: &Addr,
        submessages: Vec<SubMsg<Empty>>,
        mut res: AppResponse,
        mut trace: Option<&mut Vec<TraceEntry>>,
    ) -> AnyResult<AppResponse> {
        let s0 = self.store_snapshot();

        for m in submessages {
            match self.execute_submsg(addr, m, trace.as_deref_mut()) {
                Err(e) => {
                    *self.store.borrow_mut() = s0;
                    return Err(e);
                }
                Ok(sub_res) => {
                    res.events.extend(sub_res.events);
                    if let Some(data) = sub_res.data {
                        res.data = Some(data);
                    }
                }
            }
        }

        Ok(res)
    }

    /// The reply-on matrix. `addr` is the contract that
    /// emitted the submessage — it both sends the inner message (as
    /// sender) and is the one whose `reply` handler fires.
    fn execute_submsg(
        &self,
        addr: &Addr,
        m: SubMsg<Empty>,
        mut trace: Option<&mut Vec<TraceEntry>>,
    ) -> AnyResult<AppResponse> {
        let SubMsg {
            id,
            msg,
            reply_on,
            payload,
            ..
        } = m;

        let r = self.handle_msg(addr.clone(), msg, trace.as_deref_mut());

        match (r, reply_on) {
            (Ok(app), ReplyOn::Never) => Ok(AppResponse {
                events: app.events,
                data: None,
            }),
            (Ok(app), ReplyOn::Error) => Ok(AppResponse {
                events: app.events,
                data: None,
            }),
            (Ok(app), ReplyOn::Success) | (Ok(app), ReplyOn::Always) => {
                let reply_msg = Reply {
                    id,
                    payload: payload.clone(),
                    gas_used: 0,
                    result: SubMsgResult::Ok(SubMsgResponse {
                        events: app.events.clone(),
                        data: app.data.clone(),
                        msg_responses: vec![],
                    }),
                };
                let reply_res = self.reply(addr, reply_msg, trace.as_deref_mut())?;
                let data = reply_res.data.or(app.data);
                let mut events = app.events;
                events.extend(reply_res.events);
                Ok(AppResponse { events, data })
            }
            (Err(e), ReplyOn::Never) | (Err(e), ReplyOn::Success) => Err(e),
            (Err(e), ReplyOn::Error) | (Err(e), ReplyOn::Always) => {
                let reply_msg = Reply {
                    id,
                    payload,
                    gas_used: 0,
                    result: SubMsgResult::Err(e.to_string()),
                };
                // a successful reply here swallows the original failure;
                // storage writes from the failed subtree are already gone
                // -- that revert happened inside the nested
                // execute_contract/instantiate_contract call itself.
                self.reply(addr, reply_msg, trace.as_deref_mut())
            }
            (Ok(_), _) | (Err(_), _) => unreachable!("ReplyOn is exhaustively matched above"),
        }
    }
}
