//! Command argument encoding.
//!
//! Builds `<prefix><field1>,<field2>,...,<fieldN>` into a [`BufferCursor`].
//!
//! | Kind     | Encoding                                   |
//! |----------|--------------------------------------------|
//! | signed   | decimal, leading `-` when negative         |
//! | unsigned | decimal, no leading zeros                  |
//! | bool     | exactly `0` or `1`, never elided           |
//! | text     | `"` + text + `"`                           |
//!
//! When the schema is optional, a sentinel-valued non-boolean field is written
//! as its separator alone so later fields keep their positions.

use std::fmt::Write;

use crate::cursor::BufferCursor;
use crate::error::{AtError, AtResult};
use crate::schema::CommandSchema;
use crate::value::Value;

/// Separator written after every field.
pub const SEPARATOR: u8 = b',';

/// Quote wrapped around text fields.
pub const QUOTE: u8 = b'"';

/// Encode a command into `cursor`.
///
/// On success returns the length of the command text; the byte after it is a
/// NUL. On [`AtError::EncodingOverflow`] the cursor holds a partial command
/// that must not be transmitted.
pub fn encode(
    cursor: &mut BufferCursor<'_>,
    schema: &CommandSchema,
    values: &[Value<'_>],
) -> AtResult<usize> {
    if values.len() != schema.fields.len() {
        return Err(AtError::SchemaMismatch {
            command: schema.prefix,
            reason: format!(
                "expected {} values, got {}",
                schema.fields.len(),
                values.len()
            ),
        });
    }

    cursor.put_slice(schema.prefix.as_bytes())?;

    for (index, (kind, value)) in schema.fields.iter().zip(values).enumerate() {
        if !value.matches(*kind) {
            return Err(AtError::SchemaMismatch {
                command: schema.prefix,
                reason: format!("field {} is {:?}, got {:?}", index, kind, value),
            });
        }
        if schema.is_elidable(index) && value.is_sentinel() {
            cursor.put_u8(SEPARATOR)?;
            continue;
        }
        encode_value(cursor, value)?;
        cursor.put_u8(SEPARATOR)?;
    }

    // The trailing separator becomes the terminator.
    if !schema.fields.is_empty() {
        cursor.retreat(1);
    }
    if let Err(err) = cursor.terminate() {
        log::debug!("`{}` has no room for its terminator", schema.prefix);
        return Err(err);
    }

    log::trace!(
        "encoded {:?}",
        String::from_utf8_lossy(cursor.written())
    );
    Ok(cursor.position())
}

/// Encode a command at the start of `buf`.
pub fn encode_into(buf: &mut [u8], schema: &CommandSchema, values: &[Value<'_>]) -> AtResult<usize> {
    let mut cursor = BufferCursor::new(buf);
    encode(&mut cursor, schema, values)
}

fn encode_value(cursor: &mut BufferCursor<'_>, value: &Value<'_>) -> AtResult<()> {
    let capacity = cursor.capacity();
    match value {
        Value::Signed(v) => {
            write!(cursor, "{}", v).map_err(|_| AtError::EncodingOverflow { capacity })
        }
        Value::Unsigned(v) => {
            write!(cursor, "{}", v).map_err(|_| AtError::EncodingOverflow { capacity })
        }
        Value::Bool(v) => cursor.put_u8(if *v { b'1' } else { b'0' }),
        Value::Text(text) => {
            cursor.put_u8(QUOTE)?;
            if !cursor.put_truncated(text.unwrap_or("").as_bytes()) {
                return Err(AtError::EncodingOverflow { capacity });
            }
            cursor.put_u8(QUOTE)
        }
    }
}
