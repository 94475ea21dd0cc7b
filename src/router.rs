//! The non-wasm half of the message router. Bank, staking, and
//! every other `CosmosMsg` module are external collaborators out of scope
//! for this engine — only the seam is specified here, with a failing and an
//! accepting stub covering the common cases where a host doesn't need a
//! real implementation of a given module.

use crate::error::{bail, AnyResult};
use crate::types::AppResponse;
use cosmwasm_std::{Addr, CosmosMsg, Empty};

/// Handles any `CosmosMsg` variant other than `Wasm(_)`, which the engine
/// handles itself. Swap in a real bank/staking implementation to test
/// contracts that send funds or interact with those modules; the default
/// ([`FailingExternalRouter`]) simply refuses every non-wasm message.
pub trait ExternalRouter {
    fn handle(&self, sender: &Addr, msg: CosmosMsg<Empty>) -> AnyResult<AppResponse>;
}

/// Refuses every message. The correct default: a contract that emits e.g. a
/// `BankMsg::Send` without a configured bank module should fail loudly
/// rather than silently succeed with no effect.
#[derive(Default)]
pub struct FailingExternalRouter;

impl ExternalRouter for FailingExternalRouter {
    fn handle(&self, sender: &Addr, msg: CosmosMsg<Empty>) -> AnyResult<AppResponse> {
        bail!(
            "no external module configured to handle non-wasm message {:?} from {}",
            msg,
            sender
        )
    }
}

/// Accepts every message with a no-op, default response. Useful for tests
/// that only care about the wasm-level submessage machinery and want to
/// stub out the bank/staking seam entirely.
#[derive(Default)]
pub struct AcceptingExternalRouter;

impl ExternalRouter for AcceptingExternalRouter {
    fn handle(&self, _sender: &Addr, _msg: CosmosMsg<Empty>) -> AnyResult<AppResponse> {
        Ok(AppResponse::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::BankMsg;

    #[test]
    fn failing_router_refuses_bank_messages() {
        let router = FailingExternalRouter;
        let sender = Addr::unchecked("sender");
        let msg = CosmosMsg::Bank(BankMsg::Send {
            to_address: "recipient".into(),
            amount: vec![],
        });
        let err = router.handle(&sender, msg).unwrap_err();
        assert!(err.to_string().contains("no external module configured"));
    }

    #[test]
    fn accepting_router_returns_default_response() {
        let router = AcceptingExternalRouter;
        let sender = Addr::unchecked("sender");
        let msg = CosmosMsg::Bank(BankMsg::Send {
            to_address: "recipient".into(),
            amount: vec![],
        });
        let res = router.handle(&sender, msg).unwrap();
        assert_eq!(res, AppResponse::default());
    }
}
