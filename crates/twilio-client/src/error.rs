//! Client error types.

use twilio_core::CoreError;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, TwilioError>;

/// Errors that can occur when using the Twilio client.
#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("HTTP {status} error: unable to {method} {uri}: {message}")]
    Rest {
        /// HTTP status code.
        status: u16,
        /// Request method.
        method: String,
        /// Request URI.
        uri: String,
        /// Twilio error code, when the body carried one.
        code: Option<i64>,
        /// Error message.
        message: String,
        /// Link to the error documentation.
        more_info: Option<String>,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Access token could not be obtained.
    #[error("token error: {0}")]
    Token(String),

    /// Request parameters violate the operation's contract.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<CoreError> for TwilioError {
    fn from(err: CoreError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Parameter contract violations detected before any network attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A mandatory field was absent or empty.
    #[error("{field} parameter is required for {operation}")]
    MissingRequired {
        /// Operation name, e.g. `messages.create`.
        operation: &'static str,
        /// Wire name of the missing field.
        field: &'static str,
    },

    /// None of a set of alternative fields was supplied.
    #[error("{}", alternatives_message(.fields))]
    MissingAlternative {
        /// Operation name, e.g. `messages.create`.
        operation: &'static str,
        /// Wire names of the alternatives.
        fields: &'static [&'static str],
    },
}

fn alternatives_message(fields: &[&str]) -> String {
    match fields {
        [] => "a required alternative must be provided".to_string(),
        [only] => format!("{only} must be provided"),
        [a, b] => format!("Either {a} or {b} must be provided"),
        [init @ .., last] => format!(
            "At least one of {}, or {last} must be provided",
            init.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternative_messages_read_naturally() {
        let two = ValidationError::MissingAlternative {
            operation: "messages.create",
            fields: &["From", "MessagingServiceSid"],
        };
        assert_eq!(
            two.to_string(),
            "Either From or MessagingServiceSid must be provided"
        );

        let three = ValidationError::MissingAlternative {
            operation: "messages.create",
            fields: &["Body", "MediaUrl", "ContentSid"],
        };
        assert_eq!(
            three.to_string(),
            "At least one of Body, MediaUrl, or ContentSid must be provided"
        );
    }

    #[test]
    fn missing_required_names_field_and_operation() {
        let err = ValidationError::MissingRequired {
            operation: "calls.create",
            field: "To",
        };
        assert_eq!(err.to_string(), "To parameter is required for calls.create");
    }

    #[test]
    fn core_errors_become_configuration_errors() {
        let err: TwilioError = CoreError::MissingCredential("auth_token").into();
        assert!(matches!(err, TwilioError::Configuration(msg) if msg.contains("auth_token")));
    }
}
