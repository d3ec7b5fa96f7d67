//! Field kinds and typed values.
//!
//! The wire carries no type information, so every field is described by a
//! [`FieldKind`] fixed in the command's schema. Values travel as [`Value`]s,
//! which borrow their text from whatever buffer they came from.

// ============================================================================
// Field Kinds
// ============================================================================

/// The kind of one positional field in a command or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Signed 8-bit integer, also used for small enums.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Single `0`/`1` character.
    Bool,
    /// Quoted string in commands, bare text in responses.
    Text,
}

impl FieldKind {
    /// Whether this kind is a signed integer.
    pub fn is_signed(self) -> bool {
        matches!(self, FieldKind::Int8 | FieldKind::Int16 | FieldKind::Int32)
    }

    /// Whether this kind is an unsigned integer.
    pub fn is_unsigned(self) -> bool {
        matches!(self, FieldKind::UInt8 | FieldKind::UInt16 | FieldKind::UInt32)
    }

    /// The "absent" value for this kind, or `None` for booleans which have no
    /// sentinel and are always sent.
    pub fn sentinel(self) -> Option<Value<'static>> {
        match self {
            FieldKind::Int8 | FieldKind::Int16 | FieldKind::Int32 => Some(Value::Signed(-1)),
            FieldKind::UInt8 | FieldKind::UInt16 | FieldKind::UInt32 => Some(Value::Unsigned(0)),
            FieldKind::Text => Some(Value::Text(None)),
            FieldKind::Bool => None,
        }
    }

    /// Truncate a signed accumulator to this kind's width.
    pub(crate) fn wrap_signed(self, value: i64) -> i64 {
        match self {
            FieldKind::Int8 => value as i8 as i64,
            FieldKind::Int16 => value as i16 as i64,
            FieldKind::Int32 => value as i32 as i64,
            _ => value,
        }
    }

    /// Truncate an unsigned accumulator to this kind's width.
    pub(crate) fn wrap_unsigned(self, value: u64) -> u64 {
        match self {
            FieldKind::UInt8 => value as u8 as u64,
            FieldKind::UInt16 => value as u16 as u64,
            FieldKind::UInt32 => value as u32 as u64,
            _ => value,
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A typed field value.
///
/// Text values borrow: when encoding, from the caller; when decoding, from the
/// response buffer they were parsed out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// Signed integer or enum code.
    Signed(i64),
    /// Unsigned integer.
    Unsigned(u64),
    /// Boolean flag.
    Bool(bool),
    /// Text; `None` is the absent sentinel.
    Text(Option<&'a str>),
}

impl<'a> Value<'a> {
    /// Whether this value can be carried by a field of `kind`: same kind
    /// family, and a number that fits the field's width.
    pub fn matches(&self, kind: FieldKind) -> bool {
        match *self {
            Value::Signed(v) => kind.is_signed() && kind.wrap_signed(v) == v,
            Value::Unsigned(v) => kind.is_unsigned() && kind.wrap_unsigned(v) == v,
            Value::Bool(_) => kind == FieldKind::Bool,
            Value::Text(_) => kind == FieldKind::Text,
        }
    }

    /// Whether this value equals its kind's sentinel.
    ///
    /// An unsigned zero is always the sentinel; the protocol cannot tell it
    /// apart from a genuine zero.
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            Value::Signed(-1) | Value::Unsigned(0) | Value::Text(None)
        )
    }

    /// Get the value as a signed integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Signed(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text, if this is a present text value.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Value::Text(v) => *v,
            _ => None,
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Signed(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Unsigned(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32);
impl_from_unsigned!(u8, u16, u32);

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Text(Some(v))
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(v: Option<&'a str>) -> Self {
        Value::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(FieldKind::Int8.sentinel(), Some(Value::Signed(-1)));
        assert_eq!(FieldKind::UInt16.sentinel(), Some(Value::Unsigned(0)));
        assert_eq!(FieldKind::Text.sentinel(), Some(Value::Text(None)));
        assert_eq!(FieldKind::Bool.sentinel(), None);
    }

    #[test]
    fn test_bool_is_never_sentinel() {
        assert!(!Value::Bool(false).is_sentinel());
        assert!(!Value::Bool(true).is_sentinel());
    }

    #[test]
    fn test_unsigned_zero_is_sentinel() {
        // A real zero and "absent" are the same thing on the wire.
        assert!(Value::from(0u16).is_sentinel());
        assert!(!Value::from(0i8).is_sentinel());
        assert!(Value::from(-1i16).is_sentinel());
    }

    #[test]
    fn test_matches() {
        assert!(Value::from(5i8).matches(FieldKind::Int32));
        assert!(!Value::from(5i8).matches(FieldKind::UInt8));
        assert!(Value::from("x").matches(FieldKind::Text));
        assert!(!Value::from(true).matches(FieldKind::Int8));
    }

    #[test]
    fn test_matches_checks_width() {
        assert!(!Value::Signed(1000).matches(FieldKind::Int8));
        assert!(Value::Signed(1000).matches(FieldKind::Int16));
        assert!(Value::Signed(-128).matches(FieldKind::Int8));
        assert!(!Value::Signed(-129).matches(FieldKind::Int8));
        assert!(!Value::Unsigned(256).matches(FieldKind::UInt8));
        assert!(!Value::Unsigned(u64::from(u32::MAX) + 1).matches(FieldKind::UInt32));
        assert!(Value::from(u32::MAX).matches(FieldKind::UInt32));
    }

    #[test]
    fn test_wrap_to_width() {
        assert_eq!(FieldKind::Int8.wrap_signed(200), -56);
        assert_eq!(FieldKind::UInt8.wrap_unsigned(300), 44);
        assert_eq!(FieldKind::Int32.wrap_signed(-40), -40);
    }
}
