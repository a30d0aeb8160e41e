//! Pulls a negotiation observation out of a free-text chat message.

use serde_json::{Deserializer, Value};

use crate::errors::ConfigurationError;
use crate::protocol::{handle_request, parse_request, NegotiationResponse};
use crate::strategy::allocator::Allocator;
use crate::strategy::evaluator::OfferEvaluator;
use crate::strategy::AspirationNegotiator;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Finds the JSON observation inside `message`.
///
/// Lookup order: a fenced ```` ```json ```` block, then the whole message,
/// then the first `{...}` object embedded in surrounding prose.
pub fn extract_observation(message: &str) -> Result<Value, ConfigurationError> {
    if let Some(start) = message.find(FENCE_OPEN) {
        let body = &message[start + FENCE_OPEN.len()..];
        let body = body.find(FENCE_CLOSE).map_or(body, |end| &body[..end]);
        return serde_json::from_str(body.trim()).map_err(|error| {
            ConfigurationError::Malformed(format!("fenced json block: {error}"))
        });
    }

    if let Ok(value) = serde_json::from_str::<Value>(message.trim()) {
        if value.is_object() {
            return Ok(value);
        }
    }

    message
        .match_indices('{')
        .find_map(|(offset, _)| {
            Deserializer::from_str(&message[offset..])
                .into_iter::<Value>()
                .next()
                .and_then(Result::ok)
                .filter(Value::is_object)
        })
        .ok_or(ConfigurationError::MissingObservation)
}

pub fn handle_message<A, E>(
    negotiator: &AspirationNegotiator<A, E>,
    message: &str,
) -> Result<NegotiationResponse, ConfigurationError>
where
    A: Allocator,
    E: OfferEvaluator,
{
    let request = parse_request(extract_observation(message)?)?;
    handle_request(negotiator, &request)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::errors::ConfigurationError;
    use crate::protocol::NegotiationResponse;
    use crate::strategy::AspirationNegotiator;

    use super::{extract_observation, handle_message};

    #[test]
    fn fenced_block_wins_over_other_objects() {
        let message = "Round 2. {\"ignored\": true}\n```json\n{\"action\": \"PROPOSE\"}\n```\nGood luck.";
        assert_eq!(extract_observation(message), Ok(json!({"action": "PROPOSE"})));
    }

    #[test]
    fn bare_json_message_is_parsed_whole() {
        let message = "  {\"action\": \"ACCEPT_OR_REJECT\", \"offer_value\": 3}  ";
        assert_eq!(
            extract_observation(message),
            Ok(json!({"action": "ACCEPT_OR_REJECT", "offer_value": 3}))
        );
    }

    #[test]
    fn embedded_object_is_found_in_prose() {
        let message = "You are the proposer. Observation: {\"action\": \"PROPOSE\", \"meta\": {\"round\": 1}} respond in JSON.";
        assert_eq!(
            extract_observation(message),
            Ok(json!({"action": "PROPOSE", "meta": {"round": 1}}))
        );
    }

    #[test]
    fn stray_braces_are_skipped() {
        let message = "set {a, b} then {\"action\": \"PROPOSE\"}";
        assert_eq!(extract_observation(message), Ok(json!({"action": "PROPOSE"})));
    }

    #[test]
    fn message_without_json_is_rejected() {
        assert_eq!(
            extract_observation("no structured data here"),
            Err(ConfigurationError::MissingObservation)
        );
        assert!(matches!(
            extract_observation("```json\n{not json}\n```"),
            Err(ConfigurationError::Malformed(_))
        ));
    }

    #[test]
    fn handle_message_runs_the_full_route() {
        let message = "```json\n{\"action\": \"PROPOSE\", \"quantities\": [7, 4, 1], \"valuations_self\": [45, 72, 33], \"batna_self\": 0}\n```";

        let response =
            handle_message(&AspirationNegotiator::default(), message).expect("valid message");
        let NegotiationResponse::Propose(proposal) = response else {
            panic!("expected a proposal");
        };
        assert_eq!(proposal.allocation_self, vec![5, 4, 0]);
        assert_eq!(proposal.allocation_other, vec![2, 0, 1]);
    }
}
