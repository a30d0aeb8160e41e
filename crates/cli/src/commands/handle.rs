use bargainer_core::handle_message;

use crate::commands::{load_negotiator, CommandResult};

const COMMAND: &str = "handle";

/// Answers one free-text message the way `POST /message` does.
pub fn run(message: &str) -> CommandResult {
    let negotiator = match load_negotiator(COMMAND) {
        Ok(negotiator) => negotiator,
        Err(result) => return result,
    };

    match handle_message(&negotiator, message) {
        Ok(response) => CommandResult::response(COMMAND, &response),
        Err(error) => CommandResult::invalid_request(COMMAND, error),
    }
}
