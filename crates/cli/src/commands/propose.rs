use bargainer_core::protocol::propose;
use bargainer_core::{ConfigurationError, ProposeRequest};
use rust_decimal::Decimal;

use crate::commands::{load_negotiator, parse_decimal, parse_list, CommandResult};

const COMMAND: &str = "propose";

pub fn run(
    quantities: &str,
    valuations: &str,
    batna: Option<&str>,
    target_fraction: Option<&str>,
) -> CommandResult {
    let negotiator = match load_negotiator(COMMAND) {
        Ok(negotiator) => negotiator,
        Err(result) => return result,
    };

    let request = match build_request(quantities, valuations, batna, target_fraction) {
        Ok(request) => request,
        Err(error) => return CommandResult::invalid_request(COMMAND, error),
    };

    match propose(&negotiator, &request) {
        Ok(response) => CommandResult::response(COMMAND, &response),
        Err(error) => CommandResult::invalid_request(COMMAND, error),
    }
}

fn build_request(
    quantities: &str,
    valuations: &str,
    batna: Option<&str>,
    target_fraction: Option<&str>,
) -> Result<ProposeRequest, ConfigurationError> {
    Ok(ProposeRequest {
        quantities: parse_list("quantities", quantities)?,
        valuations_self: parse_list("valuations", valuations)?,
        batna_self: batna
            .map(|raw| parse_decimal("batna", raw))
            .transpose()?
            .unwrap_or(Decimal::ZERO),
        target_fraction: target_fraction
            .map(|raw| parse_decimal("target-fraction", raw))
            .transpose()?,
    })
}
