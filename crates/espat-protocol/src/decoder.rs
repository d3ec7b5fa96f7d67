//! In-place response decoding.
//!
//! Fields are recovered positionally from a `,`-delimited payload. Nothing is
//! copied: text values are slices of the payload, and the delimiter that ended
//! each text field is overwritten with a NUL.
//!
//! An empty field (two separators in a row, or a separator at the very end)
//! decodes to its kind's sentinel, the same way the encoder elides an absent
//! optional value. Text wrapped in `"` is returned without its quotes, so an
//! empty quoted string stays distinct from an absent one.
//!
//! The wire carries no types. A field decoded against the wrong kind produces
//! a meaningless value, not an error; only running out of bytes before every
//! scheduled field is read is reported.

use std::mem;

use crate::cursor::TERMINATOR;
use crate::encoder::{QUOTE, SEPARATOR};
use crate::error::{AtError, AtResult};
use crate::value::{FieldKind, Value};

/// Bytes that end a field.
pub const DELIMITERS: [u8; 2] = [SEPARATOR, b'\r'];

fn is_delimiter(byte: u8) -> bool {
    DELIMITERS.contains(&byte)
}

/// A read position moving forward through a mutable payload.
#[derive(Debug)]
pub struct ArgumentDecoder<'a> {
    remaining: &'a mut [u8],
    consumed: usize,
    /// A field is owed: the payload start, or a separator was just consumed.
    field_pending: bool,
}

impl<'a> ArgumentDecoder<'a> {
    /// Start decoding at the beginning of `payload`.
    pub fn new(payload: &'a mut [u8]) -> Self {
        ArgumentDecoder {
            remaining: payload,
            consumed: 0,
            field_pending: true,
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Whether the payload is used up.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Decode the next field as `kind`.
    pub fn next(&mut self, kind: FieldKind) -> AtResult<Value<'a>> {
        if self.remaining.is_empty() {
            return match kind.sentinel() {
                Some(sentinel) if self.field_pending => {
                    self.field_pending = false;
                    Ok(sentinel)
                }
                _ => Err(AtError::MalformedResponse(format!(
                    "reply ended after {} bytes, expected another {:?} field",
                    self.consumed, kind
                ))),
            };
        }
        match kind {
            FieldKind::Bool => Ok(Value::Bool(self.next_bool())),
            FieldKind::Text => self.next_text().map(Value::Text),
            kind if kind.is_signed() => Ok(self
                .next_number()
                .map(|value| Value::Signed(kind.wrap_signed(value)))
                .unwrap_or(Value::Signed(-1))),
            kind => Ok(self
                .next_number()
                .map(|value| Value::Unsigned(kind.wrap_unsigned(value as u64)))
                .unwrap_or(Value::Unsigned(0))),
        }
    }

    fn advance(&mut self, count: usize) -> &'a mut [u8] {
        let buf = mem::take(&mut self.remaining);
        let count = count.min(buf.len());
        let (head, tail) = buf.split_at_mut(count);
        self.remaining = tail;
        self.consumed += count;
        head
    }

    fn field_len(&self) -> usize {
        self.remaining
            .iter()
            .position(|b| is_delimiter(*b))
            .unwrap_or(self.remaining.len())
    }

    /// Consume the byte that ended a field, if any, and note whether another
    /// field follows it.
    fn take_delimiter(&mut self) -> Option<&'a mut u8> {
        match self.advance(1) {
            [delimiter] => {
                self.field_pending = *delimiter == SEPARATOR;
                Some(delimiter)
            }
            _ => {
                self.field_pending = false;
                None
            }
        }
    }

    // The byte after the flag is taken to be its delimiter.
    fn next_bool(&mut self) -> bool {
        let value = self.remaining[0] == b'1';
        self.advance(1);
        self.take_delimiter();
        value
    }

    /// `None` for an empty field.
    fn next_number(&mut self) -> Option<i64> {
        let len = self.field_len();
        let digits = self.advance(len);
        self.take_delimiter();
        let (negative, digits) = match digits.split_first() {
            None => return None,
            Some((b'-', rest)) => (true, rest),
            Some(_) => (false, &digits[..]),
        };
        let magnitude = digits.iter().fold(0i64, |acc, b| {
            acc.wrapping_mul(10)
                .wrapping_add(b.wrapping_sub(b'0') as i64)
        });
        Some(if negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        })
    }

    /// `None` for an empty field; quotes are stripped from quoted text.
    fn next_text(&mut self) -> AtResult<Option<&'a str>> {
        let field: &'a [u8] = if self.remaining[0] == QUOTE {
            let close = self.remaining[1..]
                .iter()
                .position(|b| *b == QUOTE)
                .ok_or_else(|| {
                    AtError::MalformedResponse("unterminated quoted text field".to_string())
                })?;
            self.advance(1);
            let field = self.advance(close);
            self.advance(1);
            field
        } else {
            let len = self.field_len();
            if len == 0 {
                self.take_delimiter();
                return Ok(None);
            }
            self.advance(len)
        };
        if let Some(delimiter) = self.take_delimiter() {
            *delimiter = TERMINATOR;
        }
        std::str::from_utf8(field)
            .map(Some)
            .map_err(|_| AtError::MalformedResponse("text field is not valid UTF-8".to_string()))
    }
}

/// Decode `fields` from the front of `payload`.
///
/// An empty field after a trailing separator decodes to its sentinel. Fails
/// with [`AtError::MalformedResponse`] if the payload runs out before any
/// other field starts.
pub fn decode<'a, const N: usize>(
    payload: &'a mut [u8],
    fields: &[FieldKind; N],
) -> AtResult<[Value<'a>; N]> {
    let mut decoder = ArgumentDecoder::new(payload);
    let mut values = [Value::Text(None); N];
    for (slot, kind) in values.iter_mut().zip(fields) {
        *slot = decoder.next(*kind)?;
    }
    Ok(values)
}
