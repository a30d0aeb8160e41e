use thiserror::Error;

/// Invalid input handed to the negotiation core.
///
/// Every variant names the offending field so the outer layer can report it
/// verbatim. Validation happens before any allocation or decision logic runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("quantities has {quantities} entries but valuations_self has {valuations}")]
    LengthMismatch { quantities: usize, valuations: usize },
    #[error("{field}[{index}] must be >= 0, got {value}")]
    NegativeEntry { field: &'static str, index: usize, value: i64 },
    #[error("{field} must be >= 0, got {value}")]
    NegativeValue { field: &'static str, value: String },
    #[error("target_fraction must be in (0, 1], got {0}")]
    TargetFractionOutOfRange(String),
    #[error("{field} overflows the supported value range")]
    ValueOverflow { field: &'static str },
    #[error("unsupported action `{0}` (expected PROPOSE|ACCEPT_OR_REJECT)")]
    UnknownAction(String),
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("message does not contain a JSON observation")]
    MissingObservation,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }

    pub fn internal(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), correlation_id: correlation_id.into() }
    }
}

impl ConfigurationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        InterfaceError::BadRequest {
            message: self.to_string(),
            correlation_id: correlation_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ConfigurationError, InterfaceError};

    #[test]
    fn configuration_error_maps_to_bad_request_interface_error() {
        let interface = ConfigurationError::LengthMismatch { quantities: 3, valuations: 2 }
            .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message.contains("valuations_self")
        ));
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let interface = ConfigurationError::NegativeEntry {
            field: "quantities",
            index: 1,
            value: -2,
        }
        .into_interface("req-2");

        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn error_messages_name_the_offending_field() {
        let negative = ConfigurationError::NegativeValue {
            field: "counter_value",
            value: "-1".to_owned(),
        };
        assert_eq!(negative.to_string(), "counter_value must be >= 0, got -1");

        let entry = ConfigurationError::NegativeEntry {
            field: "valuations_self",
            index: 2,
            value: -33,
        };
        assert_eq!(entry.to_string(), "valuations_self[2] must be >= 0, got -33");
    }

    #[test]
    fn internal_error_keeps_correlation_id() {
        let interface = InterfaceError::internal("serializer failed", "req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.correlation_id(), "req-3");
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
