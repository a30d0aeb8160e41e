use bargainer_core::protocol::accept_or_reject;
use bargainer_core::AcceptOrRejectRequest;

use crate::commands::{load_negotiator, parse_decimal, CommandResult};

const COMMAND: &str = "evaluate";

pub fn run(offer: &str, batna: &str, counter: &str) -> CommandResult {
    let negotiator = match load_negotiator(COMMAND) {
        Ok(negotiator) => negotiator,
        Err(result) => return result,
    };

    let request = parse_decimal("offer", offer).and_then(|offer_value| {
        Ok(AcceptOrRejectRequest {
            offer_value,
            batna_value: parse_decimal("batna", batna)?,
            counter_value: parse_decimal("counter", counter)?,
        })
    });

    match request.and_then(|request| accept_or_reject(&negotiator, &request)) {
        Ok(response) => CommandResult::response(COMMAND, &response),
        Err(error) => CommandResult::invalid_request(COMMAND, error),
    }
}
