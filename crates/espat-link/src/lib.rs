//! ESP-AT Serial Link
//!
//! This crate moves AT commands over a half-duplex, echoing serial link and
//! brings back the framed reply.
//!
//! # Layers
//!
//! - [`ByteChannel`]: the raw byte link (a UART, a TCP bridge, or a mock)
//! - [`EchoTransport`]: echo-verified writes, the CR/LF submit handshake, and
//!   CRLF-framed reads with a per-call timeout
//! - [`CommandChannel`]: one complete command round trip using a single
//!   fixed-capacity buffer owned by the channel
//!
//! Everything is blocking and one command is in flight at a time. A
//! `CommandChannel` is driven through `&mut self`, so sharing one between
//! producers requires external serialization.
//!
//! # Example
//!
//! ```rust
//! use espat_link::{CommandChannel, ScriptedModem};
//! use espat_protocol::{CommandSchema, FieldKind, Value};
//!
//! const SET_MODE: CommandSchema = CommandSchema::new("AT+CWMODE=", &[FieldKind::Int8]);
//!
//! let mut modem = ScriptedModem::new();
//! modem.respond_ok();
//!
//! let mut channel = CommandChannel::new(&mut modem);
//! channel.run(&SET_MODE, &[Value::from(1i8)]).unwrap();
//! drop(channel);
//! assert_eq!(modem.last_command(), Some("AT+CWMODE=1"));
//! ```

mod channel;
mod command;
mod config;
mod mock;
mod tcp;
mod transport;

pub use channel::*;
pub use command::*;
pub use config::*;
pub use mock::*;
pub use tcp::*;
pub use transport::*;
