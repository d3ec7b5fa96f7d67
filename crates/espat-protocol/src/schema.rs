//! Command and response schemas.
//!
//! A schema is the positional contract for one command: the literal prefix,
//! the ordered field kinds, whether absent values may be elided, and how long
//! to wait for the reply. Schemas are plain `const` data so a command catalog
//! is just a list of them.

use std::time::Duration;

use crate::error::{AtError, AtResult};
use crate::value::FieldKind;

/// Reply deadline used when a schema does not set one.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Describes how a command's text is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSchema {
    /// Literal command text preceding the fields, e.g. `AT+CWJAP=`.
    pub prefix: &'static str,
    /// Ordered argument kinds.
    pub fields: &'static [FieldKind],
    /// Whether sentinel-valued (absent) non-boolean fields are elided.
    pub optional: bool,
    /// How long to wait for the reply.
    pub timeout: Duration,
}

impl CommandSchema {
    /// A command with required fields.
    pub const fn new(prefix: &'static str, fields: &'static [FieldKind]) -> Self {
        CommandSchema {
            prefix,
            fields,
            optional: false,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// A command with no arguments, e.g. `AT+CWMODE?`.
    pub const fn bare(prefix: &'static str) -> Self {
        Self::new(prefix, &[])
    }

    /// Mark every field of this command as optional.
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the reply deadline.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether field `index` may be elided when it holds its sentinel.
    ///
    /// Booleans are never elided.
    pub fn is_elidable(&self, index: usize) -> bool {
        self.optional
            && self
                .fields
                .get(index)
                .is_some_and(|kind| *kind != FieldKind::Bool)
    }
}

/// Describes the structured payload of a reply, e.g. `+CWJAP:<ssid>,<bssid>,...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSchema<const N: usize> {
    /// Literal text preceding the fields, e.g. `+CWJAP:`.
    pub prefix: &'static str,
    /// Ordered field kinds.
    pub fields: [FieldKind; N],
}

impl<const N: usize> ResponseSchema<N> {
    /// Create a response schema.
    pub const fn new(prefix: &'static str, fields: [FieldKind; N]) -> Self {
        ResponseSchema { prefix, fields }
    }
}

/// Split a literal reply prefix off the front of a payload.
pub fn strip_reply_prefix<'a>(payload: &'a mut [u8], prefix: &str) -> AtResult<&'a mut [u8]> {
    if !payload.starts_with(prefix.as_bytes()) {
        return Err(AtError::MalformedResponse(format!(
            "expected reply prefix `{}`",
            prefix
        )));
    }
    Ok(&mut payload[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOIN: CommandSchema = CommandSchema::new(
        "AT+CWJAP=",
        &[FieldKind::Text, FieldKind::Bool, FieldKind::Int8],
    )
    .optional()
    .with_timeout(Duration::from_secs(3));

    #[test]
    fn test_const_builders() {
        assert!(JOIN.optional);
        assert_eq!(JOIN.timeout, Duration::from_secs(3));
        assert_eq!(CommandSchema::bare("AT").timeout, DEFAULT_COMMAND_TIMEOUT);
    }

    #[test]
    fn test_bool_never_elidable() {
        assert!(JOIN.is_elidable(0));
        assert!(!JOIN.is_elidable(1));
        assert!(JOIN.is_elidable(2));
        assert!(!JOIN.is_elidable(3));
    }

    #[test]
    fn test_strip_reply_prefix() {
        let mut payload = *b"+CWMODE:1";
        let rest = strip_reply_prefix(&mut payload, "+CWMODE:").unwrap();
        assert_eq!(rest, b"1");

        let mut payload = *b"+CIPMUX:1";
        assert!(matches!(
            strip_reply_prefix(&mut payload, "+CWMODE:"),
            Err(AtError::MalformedResponse(_))
        ));
    }
}
