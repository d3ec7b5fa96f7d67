//! ESP-AT Command Protocol
//!
//! This crate provides the encoding and decoding half of the textual AT command
//! protocol spoken by ESP-AT WiFi modem firmware. It does no I/O; the
//! `espat-link` crate moves the encoded bytes over an echoing serial link.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → modem): `<prefix><field1>,<field2>,...,<fieldN>` followed
//!   by `\r` (echoed) and `\n` (not echoed)
//! - **Responses** (modem → host): `\r\n<payload>\r\n<status>\r\n` where the
//!   status is `OK` or `ERROR`
//! - **Fields** are positional and untyped on the wire. Both ends agree on a
//!   schema: the ordered list of [`FieldKind`]s for a command or a reply.
//!
//! All encoding happens into a caller-owned fixed-capacity buffer through a
//! [`BufferCursor`]; decoding happens in place and text values borrow the
//! response buffer.
//!
//! # Example
//!
//! ```rust
//! use espat_protocol::{encode_into, CommandSchema, FieldKind, Value};
//!
//! const SET_MODE: CommandSchema = CommandSchema::new("AT+CWMODE=", &[FieldKind::Int8]);
//!
//! let mut buffer = [0u8; 32];
//! let len = encode_into(&mut buffer, &SET_MODE, &[Value::from(1i8)]).unwrap();
//! assert_eq!(&buffer[..len], b"AT+CWMODE=1");
//! ```

mod cursor;
mod decoder;
mod encoder;
mod error;
mod frame;
mod schema;
mod value;

pub use cursor::*;
pub use decoder::*;
pub use encoder::*;
pub use error::*;
pub use frame::*;
pub use schema::*;
pub use value::*;
