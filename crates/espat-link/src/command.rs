//! Complete command round trips.

use std::time::Duration;

use espat_protocol::{
    check_status, decode, encode_into, payload_len, strip_reply_prefix, ArgumentDecoder, AtResult,
    CommandSchema, ResponseSchema, Value,
};
use tracing::{debug, warn};

use crate::channel::ByteChannel;
use crate::config::LinkConfig;
use crate::transport::EchoTransport;

/// Runs one command at a time through a single owned buffer.
///
/// The buffer holds the encoded command, then the reply overwrites it in
/// place. Values decoded by [`query`](Self::query) borrow that buffer and
/// must be dropped (or copied out) before the next command.
#[derive(Debug)]
pub struct CommandChannel<C> {
    transport: EchoTransport<C>,
    buffer: Box<[u8]>,
    config: LinkConfig,
}

impl<C: ByteChannel> CommandChannel<C> {
    /// Create a channel with the default configuration.
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, LinkConfig::default())
    }

    /// Create a channel and install the configured read timeout.
    pub fn with_config(mut channel: C, config: LinkConfig) -> Self {
        channel.set_read_timeout(config.read_timeout());
        CommandChannel {
            transport: EchoTransport::new(channel),
            buffer: vec![0u8; config.buffer_capacity].into_boxed_slice(),
            config,
        }
    }

    /// Buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// The active configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Direct access to the transport, for raw exchanges.
    pub fn transport_mut(&mut self) -> &mut EchoTransport<C> {
        &mut self.transport
    }

    /// Mutably borrow the underlying channel.
    pub fn channel_mut(&mut self) -> &mut C {
        self.transport.channel_mut()
    }

    /// Unwrap the underlying channel.
    pub fn into_inner(self) -> C {
        self.transport.into_inner()
    }

    /// Encode, send, and read the reply. Returns the count of reply bytes now
    /// at the front of the buffer.
    fn transact(&mut self, schema: &CommandSchema, values: &[Value<'_>]) -> AtResult<usize> {
        if self.config.drain_before_command {
            let stale = self.transport.drain(self.config.drain_timeout());
            if stale > 0 {
                debug!(stale, "discarded stale inbound bytes");
            }
        }

        let len = encode_into(&mut self.buffer, schema, values)?;
        self.transport
            .exchange(&mut self.buffer, len, schema.timeout)
            .inspect_err(|err| warn!(command = schema.prefix, error = %err, "command failed"))
    }

    /// Run a command whose reply carries nothing but a status.
    pub fn run(&mut self, schema: &CommandSchema, values: &[Value<'_>]) -> AtResult<()> {
        let received = self.transact(schema, values)?;
        check_status(&self.buffer[..received])
            .inspect_err(|err| debug!(command = schema.prefix, error = %err, "command rejected"))
    }

    /// Run a command and decode its structured reply.
    pub fn query<const N: usize>(
        &mut self,
        schema: &CommandSchema,
        values: &[Value<'_>],
        response: &ResponseSchema<N>,
    ) -> AtResult<[Value<'_>; N]> {
        let received = self.transact(schema, values)?;
        let len = payload_len(&self.buffer[..received])?;
        let fields = strip_reply_prefix(&mut self.buffer[..len], response.prefix)?;
        decode(fields, &response.fields)
    }

    /// Run a command and hand its reply fields, after `reply_prefix`, to
    /// `parse`. For replies whose later fields depend on earlier ones.
    pub fn query_with<'s, T, F>(
        &'s mut self,
        schema: &CommandSchema,
        values: &[Value<'_>],
        reply_prefix: &str,
        parse: F,
    ) -> AtResult<T>
    where
        F: FnOnce(&mut ArgumentDecoder<'s>) -> AtResult<T>,
    {
        let received = self.transact(schema, values)?;
        let len = payload_len(&self.buffer[..received])?;
        let fields = strip_reply_prefix(&mut self.buffer[..len], reply_prefix)?;
        parse(&mut ArgumentDecoder::new(fields))
    }

    /// Discard inbound bytes until the line stays quiet for `timeout`.
    pub fn drain(&mut self, timeout: Duration) -> usize {
        self.transport.drain(timeout)
    }
}
