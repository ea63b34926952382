//! Error types for the oracle boundary
//!
//! The taxonomy separates transport-class failures (network, timeout,
//! non-2xx) from schema-class failures (the oracle responded but the content
//! does not validate). Schema failures always carry the raw response text so
//! the caller can inspect what came back.

/// Errors crossing the oracle boundary
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Network-level failure reaching the oracle
    #[error("oracle transport failure: {message}")]
    Transport {
        /// Underlying cause
        message: String,
    },

    /// Oracle answered with a non-2xx status
    #[error("oracle returned status {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        body: String,
    },

    /// Oracle call exceeded the configured deadline
    #[error("oracle call timed out after {seconds}s")]
    Timeout {
        /// Deadline that was exceeded
        seconds: u64,
    },

    /// Request referenced a template the pack does not carry
    #[error("unknown prompt template: {0}")]
    UnknownTemplate(String),

    /// Request omitted a variable the template requires
    #[error("template {template} missing required variable {variable}")]
    MissingVariable {
        /// Template being rendered
        template: String,
        /// Variable that was absent
        variable: String,
    },

    /// The template pack itself failed to load
    #[error("template pack malformed: {0}")]
    TemplatePack(String),

    /// Oracle responded but the content fails schema validation
    #[error("malformed judgment: {reason}")]
    MalformedJudgment {
        /// What failed to validate
        reason: String,
        /// The raw response text, unmodified
        raw: String,
    },

    /// The client could not be constructed
    #[error("oracle configuration: {0}")]
    Config(String),
}

impl OracleError {
    /// Build a schema-validation failure carrying the raw response
    #[inline]
    #[must_use]
    pub fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedJudgment {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Whether this is a transport-class failure (network/timeout/non-2xx)
    ///
    /// Transport failures are retryable; schema failures are not.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Http { .. } | Self::Timeout { .. }
        )
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { seconds: 0 }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(OracleError::Timeout { seconds: 30 }.is_transport());
        assert!(OracleError::Http { status: 503, body: String::new() }.is_transport());
        assert!(!OracleError::malformed("bad shape", "{}").is_transport());
        assert!(!OracleError::UnknownTemplate("x".into()).is_transport());
    }

    #[test]
    fn malformed_keeps_raw_text() {
        let err = OracleError::malformed("missing key", "not json at all");
        match err {
            OracleError::MalformedJudgment { raw, .. } => assert_eq!(raw, "not json at all"),
            other => panic!("unexpected: {other}"),
        }
    }
}
