//! Request/response payloads and the action router.
//!
//! A request is tagged by its `action` field:
//!
//! ```json
//! {"action": "PROPOSE", "quantities": [7, 4, 1], "valuations_self": [45, 72, 33], "batna_self": 0}
//! {"action": "ACCEPT_OR_REJECT", "offer_value": 150, "batna_value": 100, "counter_value": 160}
//! ```
//!
//! Transport, authentication and framing belong to the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ItemSet, OfferContext, Verdict};
use crate::errors::ConfigurationError;
use crate::strategy::allocator::{ensure_non_negative, Allocator};
use crate::strategy::evaluator::OfferEvaluator;
use crate::strategy::AspirationNegotiator;

pub const ACTION_PROPOSE: &str = "PROPOSE";
pub const ACTION_ACCEPT_OR_REJECT: &str = "ACCEPT_OR_REJECT";
const ACTION_ACCEPT_ALIAS: &str = "ACCEPT";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NegotiationRequest {
    Propose(ProposeRequest),
    #[serde(alias = "ACCEPT")]
    AcceptOrReject(AcceptOrRejectRequest),
}

impl NegotiationRequest {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Propose(_) => ACTION_PROPOSE,
            Self::AcceptOrReject(_) => ACTION_ACCEPT_OR_REJECT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeRequest {
    pub quantities: Vec<i64>,
    pub valuations_self: Vec<i64>,
    #[serde(default)]
    pub batna_self: Decimal,
    /// Overrides the negotiator's configured aspiration for this call only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fraction: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptOrRejectRequest {
    pub offer_value: Decimal,
    pub batna_value: Decimal,
    pub counter_value: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeResponse {
    pub allocation_self: Vec<u64>,
    pub allocation_other: Vec<u64>,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptOrRejectResponse {
    pub accept: bool,
    pub action: Verdict,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NegotiationResponse {
    Propose(ProposeResponse),
    AcceptOrReject(AcceptOrRejectResponse),
}

/// Turns a decoded JSON value into a typed request.
///
/// The action tag is matched case-insensitively; missing or non-numeric
/// fields surface as [`ConfigurationError::Malformed`].
pub fn parse_request(mut value: Value) -> Result<NegotiationRequest, ConfigurationError> {
    let object = value.as_object_mut().ok_or_else(|| {
        ConfigurationError::Malformed("request must be a JSON object".to_owned())
    })?;

    let action = object
        .get("action")
        .and_then(Value::as_str)
        .map(|action| action.trim().to_ascii_uppercase())
        .ok_or_else(|| ConfigurationError::Malformed("missing string field `action`".to_owned()))?;

    if ![ACTION_PROPOSE, ACTION_ACCEPT_OR_REJECT, ACTION_ACCEPT_ALIAS].contains(&action.as_str()) {
        return Err(ConfigurationError::UnknownAction(action));
    }
    object.insert("action".to_owned(), Value::String(action));

    serde_json::from_value(value).map_err(|error| ConfigurationError::Malformed(error.to_string()))
}

pub fn handle_request<A, E>(
    negotiator: &AspirationNegotiator<A, E>,
    request: &NegotiationRequest,
) -> Result<NegotiationResponse, ConfigurationError>
where
    A: Allocator,
    E: OfferEvaluator,
{
    match request {
        NegotiationRequest::Propose(request) => {
            propose(negotiator, request).map(NegotiationResponse::Propose)
        }
        NegotiationRequest::AcceptOrReject(request) => {
            accept_or_reject(negotiator, request).map(NegotiationResponse::AcceptOrReject)
        }
    }
}

pub fn propose<A, E>(
    negotiator: &AspirationNegotiator<A, E>,
    request: &ProposeRequest,
) -> Result<ProposeResponse, ConfigurationError>
where
    A: Allocator,
    E: OfferEvaluator,
{
    let items = ItemSet::new(&request.quantities, &request.valuations_self)?;
    ensure_non_negative("batna_self", request.batna_self)?;

    let allocation = negotiator.propose(&items, request.target_fraction)?;
    Ok(ProposeResponse {
        allocation_self: allocation.allocation_self,
        allocation_other: allocation.allocation_other,
        reason: allocation.reason,
    })
}

pub fn accept_or_reject<A, E>(
    negotiator: &AspirationNegotiator<A, E>,
    request: &AcceptOrRejectRequest,
) -> Result<AcceptOrRejectResponse, ConfigurationError>
where
    A: Allocator,
    E: OfferEvaluator,
{
    let evaluation = negotiator.judge(&OfferContext {
        offer_value: request.offer_value,
        batna_value: request.batna_value,
        counter_value: request.counter_value,
    })?;

    Ok(AcceptOrRejectResponse {
        accept: evaluation.accept,
        action: evaluation.action,
        reason: evaluation.reason,
    })
}
