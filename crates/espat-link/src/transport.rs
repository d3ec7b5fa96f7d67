//! Echo-verified transport.
//!
//! The modem reflects every command byte back before it accepts the next one.
//! Writes are checked against that echo one byte at a time, commands are
//! submitted with a CR (echoed) and LF (swallowed), and replies are read
//! after a mandatory `\r\n` preamble.
//!
//! ```text
//! host  : A T + C W M O D E ? \r \n
//! modem : A T + C W M O D E ? \r       \r \n +CWMODE:1 \r \n OK \r \n
//! ```

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use espat_protocol::{AtError, AtResult, CR, LF};
use tracing::{debug, trace, warn};

use crate::channel::ByteChannel;

// ============================================================================
// Echo State Machine
// ============================================================================

/// Progress of one echo-verified write.
///
/// `Idle` → `Sending` → one of the terminal states `Echoed`, `Mismatch`,
/// `WriteFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoState {
    /// Nothing sent yet.
    Idle,
    /// Bytes are being sent; all so far were echoed.
    Sending {
        /// Bytes sent and echo-confirmed.
        confirmed: usize,
    },
    /// Every requested byte was sent and echoed.
    Echoed {
        /// Bytes sent and echo-confirmed.
        confirmed: usize,
    },
    /// The modem echoed a different byte, or nothing before the timeout.
    Mismatch {
        /// Bytes confirmed before the bad echo.
        confirmed: usize,
        /// The byte that was sent.
        sent: u8,
        /// What came back, `None` on timeout.
        echoed: Option<u8>,
    },
    /// The channel refused the byte.
    WriteFailed {
        /// Bytes confirmed before the failed send.
        confirmed: usize,
    },
}

impl EchoState {
    /// Bytes sent and echo-confirmed in this state.
    pub fn confirmed(&self) -> usize {
        match *self {
            EchoState::Idle => 0,
            EchoState::Sending { confirmed }
            | EchoState::Echoed { confirmed }
            | EchoState::Mismatch { confirmed, .. }
            | EchoState::WriteFailed { confirmed } => confirmed,
        }
    }

    /// Whether no further bytes will be sent.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EchoState::Echoed { .. } | EchoState::Mismatch { .. } | EchoState::WriteFailed { .. }
        )
    }
}

/// Drives one echo-verified write over a channel.
pub struct EchoWriter<'c, C: ByteChannel + ?Sized> {
    channel: &'c mut C,
    state: EchoState,
}

impl<'c, C: ByteChannel + ?Sized> EchoWriter<'c, C> {
    /// Start a write in the `Idle` state.
    pub fn new(channel: &'c mut C) -> Self {
        EchoWriter {
            channel,
            state: EchoState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> EchoState {
        self.state
    }

    /// Send `byte` and wait for its echo. Does nothing once terminal.
    pub fn step(&mut self, byte: u8) -> EchoState {
        if self.state.is_terminal() {
            return self.state;
        }
        let confirmed = self.state.confirmed();

        if let Err(err) = self.channel.write_byte(byte) {
            warn!(confirmed, error = %err, "byte write failed");
            self.state = EchoState::WriteFailed { confirmed };
            return self.state;
        }

        self.state = match self.channel.read_byte() {
            Some(echoed) if echoed == byte => EchoState::Sending {
                confirmed: confirmed + 1,
            },
            echoed => {
                debug!(confirmed, sent = byte, ?echoed, "echo mismatch");
                EchoState::Mismatch {
                    confirmed,
                    sent: byte,
                    echoed,
                }
            }
        };
        self.state
    }

    /// End the write. A write that never failed becomes `Echoed`.
    pub fn finish(self) -> EchoState {
        match self.state {
            EchoState::Idle | EchoState::Sending { .. } => EchoState::Echoed {
                confirmed: self.state.confirmed(),
            },
            terminal => terminal,
        }
    }
}

// ============================================================================
// Scoped Timeout
// ============================================================================

/// Overrides a channel's read timeout until dropped.
///
/// The previous timeout comes back on every exit path, early returns included.
pub struct ScopedTimeout<'c, C: ByteChannel + ?Sized> {
    channel: &'c mut C,
    previous: Duration,
}

impl<'c, C: ByteChannel + ?Sized> ScopedTimeout<'c, C> {
    /// Install `timeout` on `channel`.
    pub fn new(channel: &'c mut C, timeout: Duration) -> Self {
        let previous = channel.set_read_timeout(timeout);
        ScopedTimeout { channel, previous }
    }
}

impl<C: ByteChannel + ?Sized> Deref for ScopedTimeout<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.channel
    }
}

impl<C: ByteChannel + ?Sized> DerefMut for ScopedTimeout<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.channel
    }
}

impl<C: ByteChannel + ?Sized> Drop for ScopedTimeout<'_, C> {
    fn drop(&mut self) {
        self.channel.set_read_timeout(self.previous);
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Echo-verified writes and CRLF-framed reads over a [`ByteChannel`].
///
/// The transport never retries and never distinguishes a busy modem from a
/// corrupted line.
#[derive(Debug)]
pub struct EchoTransport<C> {
    channel: C,
}

impl<C: ByteChannel> EchoTransport<C> {
    /// Wrap a byte channel.
    pub fn new(channel: C) -> Self {
        EchoTransport { channel }
    }

    /// Borrow the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Mutably borrow the underlying channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Unwrap the underlying channel.
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Send `bytes`, checking each echo, and report where the write ended.
    pub fn write_tracked(&mut self, bytes: &[u8]) -> EchoState {
        let mut writer = EchoWriter::new(&mut self.channel);
        for &byte in bytes {
            if writer.step(byte).is_terminal() {
                break;
            }
        }
        writer.finish()
    }

    /// Send `bytes`, checking each echo.
    ///
    /// Returns the number of bytes sent and echo-confirmed, which is short of
    /// `bytes.len()` as soon as an echo mismatches or a send fails.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        self.write_tracked(bytes).confirmed()
    }

    /// Like [`write`](Self::write) but stops at the first NUL byte, for
    /// NUL-terminated constant text.
    pub fn write_terminated(&mut self, text: &[u8]) -> usize {
        let len = text.iter().position(|b| *b == 0).unwrap_or(text.len());
        self.write(&text[..len])
    }

    /// Send the end-of-command handshake: CR (echoed) then LF (not echoed).
    pub fn submit(&mut self) -> AtResult<()> {
        if self.write(&[CR]) != 1 {
            warn!("carriage return was not echoed");
            return Err(AtError::SubmissionFailure);
        }
        if let Err(err) = self.channel.write_byte(LF) {
            warn!(error = %err, "line feed write failed");
            return Err(AtError::SubmissionFailure);
        }
        Ok(())
    }

    /// Read a framed reply into `buf` with a read timeout of `timeout`.
    ///
    /// The next two bytes must be `\r\n`; they are consumed and not stored.
    /// Then reads until `buf` is full or a byte times out and returns the
    /// count stored. The channel's previous timeout is restored on return.
    pub fn read(&mut self, buf: &mut [u8], timeout: Duration) -> AtResult<usize> {
        let mut channel = ScopedTimeout::new(&mut self.channel, timeout);

        for expected in [CR, LF] {
            match channel.read_byte() {
                Some(byte) if byte == expected => {}
                Some(byte) => {
                    debug!(expected, got = byte, "bad response preamble");
                    return Err(AtError::FramingError);
                }
                None => return Err(AtError::ReadTimeout),
            }
        }

        let count = channel.read_bytes(buf);
        trace!(count, capacity = buf.len(), "response read");
        Ok(count)
    }

    fn transmit(&mut self, command: &[u8]) -> AtResult<()> {
        let confirmed = self.write(command);
        if confirmed != command.len() {
            return Err(AtError::EchoMismatch {
                confirmed,
                requested: command.len(),
            });
        }
        self.submit()
    }

    /// Send `command`, submit it, and read the reply into `reply`.
    pub fn send_and_await_reply(
        &mut self,
        command: &[u8],
        reply: &mut [u8],
        timeout: Duration,
    ) -> AtResult<usize> {
        self.transmit(command)?;
        self.read(reply, timeout)
    }

    /// Send the first `command_len` bytes of `buffer` as a command, then read
    /// the reply into the same buffer.
    ///
    /// A `command_len` past the end of `buffer` is an
    /// [`AtError::EncodingOverflow`] and nothing is sent.
    pub fn exchange(
        &mut self,
        buffer: &mut [u8],
        command_len: usize,
        timeout: Duration,
    ) -> AtResult<usize> {
        let command = buffer.get(..command_len).ok_or(AtError::EncodingOverflow {
            capacity: buffer.len(),
        })?;
        self.transmit(command)?;
        self.read(buffer, timeout)
    }

    /// Discard bytes until the line stays quiet for `timeout`.
    ///
    /// Returns how many bytes were thrown away.
    pub fn drain(&mut self, timeout: Duration) -> usize {
        let mut channel = ScopedTimeout::new(&mut self.channel, timeout);
        let mut count = 0;
        while channel.read_byte().is_some() {
            count += 1;
        }
        count
    }
}
