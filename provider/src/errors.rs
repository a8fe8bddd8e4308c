//! Error types for the Lagoon provider

use thiserror::Error;

/// Main error type for the Lagoon provider
#[derive(Error, Debug)]
pub enum LagoonError {
    /// Raised by validators before any network call. Always carries the
    /// offending field name and a corrective message.
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Transport-level failure: DNS, TLS, timeout, non-2xx HTTP status,
    /// malformed JSON. Always propagated.
    #[error("connection error: {0}")]
    Connection(String),

    /// The API responded but reported GraphQL-level errors. The message
    /// aggregates all reported error strings.
    #[error("API error: {0}")]
    Api(String),

    #[error("token error: {0}")]
    Token(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LagoonError {
    /// Build a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LagoonError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for pre-flight validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, LagoonError::Validation { .. })
    }

    /// True for GraphQL-level errors reported by the API itself.
    pub fn is_api(&self) -> bool {
        matches!(self, LagoonError::Api(_))
    }

    /// True for transport-level failures.
    pub fn is_connection(&self) -> bool {
        matches!(self, LagoonError::Connection(_))
    }

    /// Whether this error indicates the server runs an older API schema
    /// generation. The remote API reports no structured error codes, so the
    /// only available signal is the wording of the error message (or a bare
    /// HTTP 400 for malformed-by-old-standards requests).
    pub fn is_schema_mismatch(&self) -> bool {
        match self {
            LagoonError::Api(message) => {
                message.contains("Cannot query field") || message.contains("Unknown argument")
            }
            LagoonError::Connection(message) => message.contains("400"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for LagoonError {
    fn from(err: reqwest::Error) -> Self {
        LagoonError::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for LagoonError {
    fn from(err: serde_json::Error) -> Self {
        LagoonError::Connection(format!("malformed response: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_matches_unknown_field_wording() {
        let err = LagoonError::Api("Cannot query field \"addKubernetes\" on type \"Mutation\"".into());
        assert!(err.is_schema_mismatch());

        let err = LagoonError::Api("Unknown argument \"weight\" on field \"addDeployTargetConfig\"".into());
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn schema_mismatch_matches_http_400() {
        let err = LagoonError::Connection("400 Bad Request: {}".into());
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn schema_mismatch_ignores_other_errors() {
        assert!(!LagoonError::Api("Project not found".into()).is_schema_mismatch());
        assert!(!LagoonError::Connection("connection refused".into()).is_schema_mismatch());
        assert!(!LagoonError::validation("name", "too long").is_schema_mismatch());
    }
}
