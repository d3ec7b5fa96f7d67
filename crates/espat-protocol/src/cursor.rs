//! Bounds-tracked write position into a fixed-capacity buffer.

use std::fmt;

use crate::error::{AtError, AtResult};

/// NUL byte left after encoded text.
pub const TERMINATOR: u8 = 0;

/// A write cursor over a caller-owned byte region.
///
/// The cursor never grows the region. Every write either fits entirely or
/// fails with [`AtError::EncodingOverflow`] without touching the buffer,
/// except [`put_truncated`](BufferCursor::put_truncated) which copies what fits.
#[derive(Debug)]
pub struct BufferCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufferCursor<'a> {
    /// Create a cursor at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        BufferCursor { buf, pos: 0 }
    }

    /// Total capacity of the underlying region.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether no space is left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    fn overflow(&self) -> AtError {
        AtError::EncodingOverflow {
            capacity: self.buf.len(),
        }
    }

    /// Append one byte.
    pub fn put_u8(&mut self, byte: u8) -> AtResult<()> {
        if self.is_exhausted() {
            return Err(self.overflow());
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    /// Append a whole slice, or nothing if it does not fit.
    pub fn put_slice(&mut self, src: &[u8]) -> AtResult<()> {
        if src.len() > self.remaining() {
            return Err(self.overflow());
        }
        self.buf[self.pos..self.pos + src.len()].copy_from_slice(src);
        self.pos += src.len();
        Ok(())
    }

    /// Copy as much of `src` as fits while keeping room for a NUL, then write
    /// that NUL without advancing.
    ///
    /// Returns `true` if all of `src` was copied. The written text is always
    /// NUL-terminated afterwards unless the cursor was already exhausted.
    pub fn put_truncated(&mut self, src: &[u8]) -> bool {
        let room = self.remaining().saturating_sub(1);
        let count = src.len().min(room);
        self.buf[self.pos..self.pos + count].copy_from_slice(&src[..count]);
        self.pos += count;
        if !self.is_exhausted() {
            self.buf[self.pos] = TERMINATOR;
        }
        count == src.len()
    }

    /// Write a NUL at the current position without advancing.
    pub fn terminate(&mut self) -> AtResult<()> {
        if self.is_exhausted() {
            return Err(self.overflow());
        }
        self.buf[self.pos] = TERMINATOR;
        Ok(())
    }

    /// Step back over the last `count` written bytes.
    pub fn retreat(&mut self, count: usize) {
        self.pos = self.pos.saturating_sub(count);
    }
}

impl fmt::Write for BufferCursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_slice(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
