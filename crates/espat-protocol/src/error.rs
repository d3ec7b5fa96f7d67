//! Error types for the AT command protocol.

use thiserror::Error;

/// Errors that can occur while issuing an AT command.
///
/// Every variant is a local "could not complete this command" signal. None of
/// them is retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AtError {
    /// The modem reflected a different byte than was sent, or none at all.
    #[error("echo mismatch: {confirmed} of {requested} bytes confirmed")]
    EchoMismatch {
        /// Bytes sent and echo-confirmed before the failure.
        confirmed: usize,
        /// Bytes the caller asked to send.
        requested: usize,
    },

    /// The command text does not fit in the command buffer.
    #[error("command does not fit in {capacity}-byte buffer")]
    EncodingOverflow {
        /// Capacity of the destination buffer.
        capacity: usize,
    },

    /// The CR/LF submit handshake did not complete.
    #[error("command submission failed")]
    SubmissionFailure,

    /// The response did not start with `\r\n`.
    #[error("response preamble was not CRLF")]
    FramingError,

    /// Not enough bytes arrived before the read deadline.
    #[error("timeout waiting for response")]
    ReadTimeout,

    /// The response was shorter than its schema or otherwise unparseable.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The modem answered `ERROR`.
    #[error("modem returned ERROR")]
    StatusError,

    /// The values passed for a command do not match its schema.
    #[error("schema mismatch for `{command}`: {reason}")]
    SchemaMismatch {
        /// Prefix of the command being encoded.
        command: &'static str,
        /// What did not match.
        reason: String,
    },
}

impl AtError {
    /// Whether this error came from the byte link rather than from the
    /// command text or the modem's answer.
    ///
    /// The link cannot tell a busy modem from a corrupted line; callers that
    /// want to retry should do so only for these.
    pub fn is_link_error(&self) -> bool {
        matches!(
            self,
            AtError::EchoMismatch { .. }
                | AtError::SubmissionFailure
                | AtError::FramingError
                | AtError::ReadTimeout
        )
    }
}

/// Result type alias for AT command operations.
pub type AtResult<T> = Result<T, AtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_errors() {
        assert!(AtError::ReadTimeout.is_link_error());
        assert!(AtError::EchoMismatch { confirmed: 2, requested: 5 }.is_link_error());
        assert!(!AtError::StatusError.is_link_error());
        assert!(!AtError::EncodingOverflow { capacity: 8 }.is_link_error());
    }

    #[test]
    fn test_display() {
        let err = AtError::EchoMismatch { confirmed: 3, requested: 10 };
        assert_eq!(err.to_string(), "echo mismatch: 3 of 10 bytes confirmed");
    }
}
