//! Error types shared by the form engine and the registration client

use thiserror::Error;

/// Misuse of the form engine API (wrong key, wrong value shape)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{key}` expects a {expected} value")]
    KindMismatch { key: String, expected: &'static str },

    #[error("field `{0}` is not a multi-choice field")]
    NotMultiChoice(String),

    #[error("`{option}` is not an option of field `{key}`")]
    UnknownOption { key: String, option: String },

    #[error("duplicate field key `{0}` in schema")]
    DuplicateField(String),

    #[error("invalid pattern for field `{key}`: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure reported by (or while reaching) the registration endpoint
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The endpoint answered with something other than "created"
    #[error("registration rejected with status {status}")]
    Rejected {
        status: u16,
        /// Server-supplied explanation, when the body carried one
        message: Option<String>,
    },

    /// Connection, DNS, TLS or body-transfer failure
    #[error("could not reach registration endpoint: {0}")]
    Transport(String),
}

impl SubmitError {
    /// Message to show the user, if the server provided one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            SubmitError::Rejected { message, .. } => message.as_deref(),
            SubmitError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_only_for_rejections() {
        let rejected = SubmitError::Rejected {
            status: 409,
            message: Some("Bed already taken".to_string()),
        };
        assert_eq!(rejected.server_message(), Some("Bed already taken"));

        let transport = SubmitError::Transport("connection refused".to_string());
        assert_eq!(transport.server_message(), None);
    }

    #[test]
    fn test_form_error_display() {
        let err = FormError::KindMismatch {
            key: "agreeToTerms".to_string(),
            expected: "boolean",
        };
        assert_eq!(err.to_string(), "field `agreeToTerms` expects a boolean value");
    }
}
