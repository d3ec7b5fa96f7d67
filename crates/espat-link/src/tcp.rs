//! Byte channel over a TCP serial bridge.
//!
//! Many ESP-AT modules sit behind a serial-to-TCP bridge (ser2net, an ESP-link
//! firmware, a test fixture). [`TcpByteChannel`] speaks to those with a
//! blocking `std::net::TcpStream` and a socket-level read timeout.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::channel::ByteChannel;

/// Shortest read timeout the socket accepts; zero would mean "block forever".
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// A [`ByteChannel`] backed by a TCP connection.
#[derive(Debug)]
pub struct TcpByteChannel {
    stream: TcpStream,
    read_timeout: Duration,
}

impl TcpByteChannel {
    /// Connect to a bridge at `addr` with a one-second read timeout.
    pub fn connect(addr: impl ToSocketAddrs + std::fmt::Debug) -> io::Result<Self> {
        debug!(?addr, "connecting to serial bridge");
        let stream = TcpStream::connect(&addr).inspect_err(|err| {
            warn!(?addr, error = %err, "serial bridge connection failed");
        })?;
        let channel = Self::from_stream(stream)?;
        info!(?addr, "serial bridge connected");
        Ok(channel)
    }

    /// Wrap an established stream.
    pub fn from_stream(stream: TcpStream) -> io::Result<Self> {
        if let Err(err) = stream.set_nodelay(true) {
            warn!(error = %err, "failed to set TCP_NODELAY (continuing anyway)");
        }
        let read_timeout = Duration::from_secs(1);
        stream.set_read_timeout(Some(read_timeout))?;
        Ok(TcpByteChannel {
            stream,
            read_timeout,
        })
    }

    /// The underlying stream.
    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }
}

impl ByteChannel for TcpByteChannel {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.stream.write_all(&[byte])
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.stream.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => None,
            Err(err) => {
                warn!(error = %err, "serial bridge read failed");
                None
            }
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Duration {
        let timeout = timeout.max(MIN_READ_TIMEOUT);
        if let Err(err) = self.stream.set_read_timeout(Some(timeout)) {
            warn!(error = %err, "failed to set socket read timeout");
        }
        std::mem::replace(&mut self.read_timeout, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandChannel;
    use espat_protocol::{CommandSchema, FieldKind, Value};
    use std::net::TcpListener;
    use std::thread;

    /// Echo every byte but LF; answer each LF with `\r\nOK\r\n`.
    fn spawn_fake_modem() -> (std::net::SocketAddr, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut byte = [0u8; 1];
            while stream.read(&mut byte).unwrap_or(0) == 1 {
                received.push(byte[0]);
                if byte[0] == b'\n' {
                    stream.write_all(b"\r\nOK\r\n").unwrap();
                    break;
                }
                stream.write_all(&byte).unwrap();
            }
            received
        });
        (addr, handle)
    }

    #[test]
    fn test_command_over_tcp() {
        let (addr, handle) = spawn_fake_modem();
        let channel = TcpByteChannel::connect(addr).unwrap();
        let mut channel = CommandChannel::new(channel);
        let schema = CommandSchema::new("AT+CWMODE=", &[FieldKind::Int8]);
        channel.run(&schema, &[Value::from(2i8)]).unwrap();
        drop(channel);
        assert_eq!(handle.join().unwrap(), b"AT+CWMODE=2\r\n");
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let (addr, _handle) = spawn_fake_modem();
        let mut channel = TcpByteChannel::connect(addr).unwrap();
        let previous = channel.set_read_timeout(Duration::ZERO);
        assert_eq!(previous, Duration::from_secs(1));
        assert_eq!(channel.set_read_timeout(Duration::from_millis(5)), MIN_READ_TIMEOUT);
        assert_eq!(channel.read_byte(), None);
    }
}
