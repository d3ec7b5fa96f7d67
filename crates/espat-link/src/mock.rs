//! Scripted modem for testing without hardware.
//!
//! [`ScriptedModem`] implements [`ByteChannel`] and behaves like an ESP-AT
//! device on the far end of a UART: every byte written is echoed back except
//! the line feed that ends a command, and a completed command releases the
//! next scripted reply into the inbound queue.
//!
//! # Example
//!
//! ```
//! use espat_link::{ByteChannel, ScriptedModem};
//!
//! let mut modem = ScriptedModem::new();
//! modem.respond_payload("+CWMODE:1");
//! for byte in *b"AT+CWMODE?\r" {
//!     modem.write_byte(byte).unwrap();
//!     assert_eq!(modem.read_byte(), Some(byte));
//! }
//! modem.write_byte(b'\n').unwrap();
//! assert_eq!(modem.last_command(), Some("AT+CWMODE?"));
//! assert_eq!(modem.pending_inbound(), "\r\n+CWMODE:1\r\nOK\r\n".len());
//! ```

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use bytes::{Buf, BufMut, BytesMut};

use crate::channel::ByteChannel;

/// Read timeout a fresh modem starts with.
const INITIAL_TIMEOUT: Duration = Duration::from_millis(1000);

/// A [`ByteChannel`] that plays back scripted replies.
///
/// Replies are consumed in order, one per completed command. A command with
/// no reply left in the script gets silence. Fault injection points are
/// indexed by write attempt, counting from zero across the modem's lifetime.
#[derive(Debug)]
pub struct ScriptedModem {
    /// Bytes waiting to be read by the host.
    inbound: BytesMut,
    /// Replies released one per completed command.
    replies: VecDeque<Vec<u8>>,
    /// Command text received since the last line feed.
    line: Vec<u8>,
    /// Completed commands, without their CR.
    commands: Vec<String>,
    /// Every byte accepted from the host.
    written: Vec<u8>,
    /// Number of `write_byte` calls so far.
    attempts: usize,
    read_timeout: Duration,
    timeout_history: Vec<Duration>,
    corrupt_echo_at: Option<usize>,
    drop_echo_at: Option<usize>,
    fail_write_at: Option<usize>,
}

impl ScriptedModem {
    /// A modem with an empty script and a one-second read timeout.
    pub fn new() -> Self {
        ScriptedModem {
            inbound: BytesMut::new(),
            replies: VecDeque::new(),
            line: Vec::new(),
            commands: Vec::new(),
            written: Vec::new(),
            attempts: 0,
            read_timeout: INITIAL_TIMEOUT,
            timeout_history: Vec::new(),
            corrupt_echo_at: None,
            drop_echo_at: None,
            fail_write_at: None,
        }
    }

    /// Queue the raw bytes released after the next command.
    pub fn respond_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.replies.push_back(bytes.to_vec());
        self
    }

    /// Reply `\r\nOK\r\n`.
    pub fn respond_ok(&mut self) -> &mut Self {
        self.respond_raw(b"\r\nOK\r\n")
    }

    /// Reply `\r\nERROR\r\n`.
    pub fn respond_error(&mut self) -> &mut Self {
        self.respond_raw(b"\r\nERROR\r\n")
    }

    /// Reply `\r\n<payload>\r\nOK\r\n`.
    pub fn respond_payload(&mut self, payload: &str) -> &mut Self {
        let reply = format!("\r\n{}\r\nOK\r\n", payload);
        self.respond_raw(reply.as_bytes())
    }

    /// Say nothing after the next command.
    pub fn respond_silence(&mut self) -> &mut Self {
        self.respond_raw(b"")
    }

    /// Put bytes on the line right now, ahead of any echo.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.inbound.put_slice(bytes);
    }

    /// Echo a corrupted byte for write attempt `index`.
    pub fn corrupt_echo_at(&mut self, index: usize) {
        self.corrupt_echo_at = Some(index);
    }

    /// Echo nothing for write attempt `index`.
    pub fn drop_echo_at(&mut self, index: usize) {
        self.drop_echo_at = Some(index);
    }

    /// Refuse write attempt `index` with an I/O error.
    pub fn fail_write_at(&mut self, index: usize) {
        self.fail_write_at = Some(index);
    }

    /// Commands received so far, oldest first.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// The most recent complete command.
    pub fn last_command(&self) -> Option<&str> {
        self.commands.last().map(String::as_str)
    }

    /// Every byte the host managed to send.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// The current read timeout.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Every timeout installed through [`ByteChannel::set_read_timeout`].
    pub fn timeout_history(&self) -> &[Duration] {
        &self.timeout_history
    }

    /// Bytes waiting to be read.
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    /// Replies not yet released.
    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }

    fn complete_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        self.commands
            .push(String::from_utf8_lossy(&line).into_owned());
        if let Some(reply) = self.replies.pop_front() {
            self.inbound.put_slice(&reply);
        }
    }
}

impl Default for ScriptedModem {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteChannel for ScriptedModem {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        let index = self.attempts;
        self.attempts += 1;

        if self.fail_write_at == Some(index) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted write failure"));
        }
        self.written.push(byte);

        match byte {
            b'\n' => {
                self.complete_line();
                return Ok(());
            }
            b'\r' => {}
            _ => self.line.push(byte),
        }

        if self.drop_echo_at == Some(index) {
            return Ok(());
        }
        let echo = if self.corrupt_echo_at == Some(index) {
            byte ^ 0x20
        } else {
            byte
        };
        self.inbound.put_u8(echo);
        Ok(())
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.inbound.has_remaining() {
            Some(self.inbound.get_u8())
        } else {
            None
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Duration {
        self.timeout_history.push(timeout);
        std::mem::replace(&mut self.read_timeout, timeout)
    }
}
