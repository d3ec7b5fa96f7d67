//! The raw byte link.

use std::io;
use std::time::Duration;

/// A blocking, byte-at-a-time link to the modem.
///
/// Reads are bounded by a per-byte timeout held by the channel. Everything
/// above this trait (echo checks, framing, schemas) is link-agnostic.
pub trait ByteChannel {
    /// Send one byte.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Wait up to the current read timeout for one byte. `None` means the
    /// deadline passed.
    fn read_byte(&mut self) -> Option<u8>;

    /// Replace the read timeout, returning the previous one.
    fn set_read_timeout(&mut self, timeout: Duration) -> Duration;

    /// Read until `buf` is full or a byte times out. Returns the count read.
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        while count < buf.len() {
            match self.read_byte() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }
}

impl<C: ByteChannel + ?Sized> ByteChannel for &mut C {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Duration {
        (**self).set_read_timeout(timeout)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        (**self).read_bytes(buf)
    }
}

impl<C: ByteChannel + ?Sized> ByteChannel for Box<C> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Duration {
        (**self).set_read_timeout(timeout)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        (**self).read_bytes(buf)
    }
}
