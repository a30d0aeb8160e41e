pub mod config;
pub mod doctor;
pub mod evaluate;
pub mod handle;
pub mod propose;

use std::str::FromStr;

use bargainer_core::config::{AppConfig, LoadOptions};
use bargainer_core::{AspirationNegotiator, ConfigurationError, DefaultNegotiator};
use rust_decimal::Decimal;
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INVALID_REQUEST: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: String,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: error_class.to_string(),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Prints a negotiation response as-is, the same body the server returns.
    pub fn response(command: &str, response: &impl Serialize) -> Self {
        match serde_json::to_string(response) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }

    pub fn invalid_request(command: &str, error: ConfigurationError) -> Self {
        Self::failure(command, "invalid_request", error.to_string(), EXIT_INVALID_REQUEST)
    }
}

/// Loads configuration and builds the negotiator with its target fraction.
pub(crate) fn load_negotiator(command: &str) -> Result<DefaultNegotiator, CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })?;

    AspirationNegotiator::with_target_fraction(config.negotiation.target_fraction).map_err(
        |error| {
            CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG)
        },
    )
}

pub(crate) fn parse_decimal(flag: &str, raw: &str) -> Result<Decimal, ConfigurationError> {
    Decimal::from_str(raw.trim()).map_err(|error| {
        ConfigurationError::Malformed(format!("--{flag} expects a number, got `{raw}`: {error}"))
    })
}

pub(crate) fn parse_list(flag: &str, raw: &str) -> Result<Vec<i64>, ConfigurationError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|entry| {
            entry.trim().parse::<i64>().map_err(|_| {
                ConfigurationError::Malformed(format!(
                    "--{flag} expects comma-separated integers, got `{}`",
                    entry.trim()
                ))
            })
        })
        .collect()
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
