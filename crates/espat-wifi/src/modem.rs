//! WiFi operations over a command channel.

use espat_link::{ByteChannel, CommandChannel};
use espat_protocol::{AtError, AtResult, CommandSchema, FieldKind, Value};
use tracing::{debug, info};

use crate::commands::*;
use crate::config::{CommandTimeouts, ModemConfig};
use crate::types::*;

/// An ESP-AT modem driven through its WiFi command set.
///
/// Every operation is one blocking command round trip. Failures come back as
/// [`AtError`] unchanged; nothing is retried.
#[derive(Debug)]
pub struct WifiModem<C> {
    channel: CommandChannel<C>,
    timeouts: CommandTimeouts,
}

impl<C: ByteChannel> WifiModem<C> {
    /// Wrap a byte channel with the default configuration.
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, ModemConfig::default())
    }

    /// Wrap a byte channel.
    pub fn with_config(channel: C, config: ModemConfig) -> Self {
        WifiModem {
            channel: CommandChannel::with_config(channel, config.link),
            timeouts: config.timeouts,
        }
    }

    /// The command deadlines in use.
    pub fn timeouts(&self) -> &CommandTimeouts {
        &self.timeouts
    }

    /// The command channel, for commands outside this catalog.
    pub fn command_channel(&mut self) -> &mut CommandChannel<C> {
        &mut self.channel
    }

    /// Unwrap the byte channel.
    pub fn into_inner(self) -> C {
        self.channel.into_inner()
    }

    fn basic(&self, schema: CommandSchema) -> CommandSchema {
        schema.with_timeout(self.timeouts.basic())
    }

    // ------------------------------------------------------------------------
    // Mode
    // ------------------------------------------------------------------------

    /// Switch the WiFi mode.
    pub fn set_mode(&mut self, mode: Mode) -> AtResult<()> {
        debug!(?mode, "setting wifi mode");
        let schema = self.basic(SET_MODE);
        self.channel.run(&schema, &[Value::from(mode.code())])
    }

    /// Switch the WiFi mode and choose whether the station rejoins its saved
    /// AP automatically.
    pub fn set_mode_with_auto_connect(&mut self, mode: Mode, auto_connect: bool) -> AtResult<()> {
        debug!(?mode, auto_connect, "setting wifi mode");
        let schema = self.basic(SET_MODE_AUTO_CONNECT);
        self.channel
            .run(&schema, &[Value::from(mode.code()), Value::from(auto_connect)])
    }

    /// Read the WiFi mode.
    pub fn mode(&mut self) -> AtResult<Mode> {
        let schema = self.basic(GET_MODE);
        let [mode] = self.channel.query(&schema, &[], &MODE_REPLY)?;
        wire_code(signed(&mode)?, "mode", Mode::from_code)
    }

    // ------------------------------------------------------------------------
    // Station
    // ------------------------------------------------------------------------

    /// Read the station state and the SSID it is using.
    pub fn state(&mut self) -> AtResult<StationState> {
        let schema = self.basic(GET_STATE);
        let [state, ssid] = self.channel.query(&schema, &[], &STATE_REPLY)?;
        let ssid = text(&ssid);
        Ok(StationState {
            state: wire_code(signed(&state)?, "state", State::from_code)?,
            ssid: (!ssid.is_empty()).then_some(ssid),
        })
    }

    /// Join the AP saved in flash.
    pub fn connect_saved(&mut self) -> AtResult<()> {
        info!("joining saved access point");
        let schema = JOIN_SAVED.with_timeout(self.timeouts.join_saved());
        self.channel.run(&schema, &[])
    }

    /// Join `ssid` with `pwd`.
    pub fn connect(&mut self, ssid: &str, pwd: &str) -> AtResult<()> {
        info!(ssid, "joining access point");
        let schema = JOIN.with_timeout(self.timeouts.join());
        self.channel.run(&schema, &[Value::from(ssid), Value::from(pwd)])
    }

    /// Join an AP with every `AT+CWJAP=` parameter available. Absent
    /// parameters are left out and take the modem's defaults.
    pub fn connect_with(&mut self, args: &ConnectArgs<'_>) -> AtResult<()> {
        info!(ssid = ?args.ssid, bssid = ?args.bssid, "joining access point");
        let schema = JOIN_WITH.with_timeout(self.timeouts.join());
        let values = [
            Value::from(args.ssid),
            Value::from(args.pwd),
            Value::from(args.bssid),
            code_or_sentinel(args.pci_en.map(PciAuthentication::code)),
            Value::from(args.reconn_interval.unwrap_or(-1)),
            Value::from(args.listen_interval.unwrap_or(-1)),
            code_or_sentinel(args.scan_mode.map(ScanMode::code)),
            Value::from(args.timeout.unwrap_or(-1)),
            code_or_sentinel(args.pmf.map(Pmf::code)),
        ];
        self.channel.run(&schema, &values)
    }

    /// Read the AP the station is joined to.
    pub fn connection(&mut self) -> AtResult<Connection> {
        let schema = self.basic(GET_CONNECTION);
        let [ssid, bssid, channel, rssi, pci_en, reconn, listen, scan_mode, pmf] =
            self.channel.query(&schema, &[], &CONNECTION_REPLY)?;
        Ok(Connection {
            ssid: text(&ssid),
            bssid: text(&bssid),
            channel: signed(&channel)? as i8,
            rssi: signed(&rssi)? as i8,
            pci_en: PciAuthentication::from(flag(&pci_en)?),
            reconn_interval: signed(&reconn)? as i16,
            listen_interval: signed(&listen)? as i16,
            scan_mode: wire_code(signed(&scan_mode)?, "scan mode", ScanMode::from_code)?,
            pmf: Pmf::from_bits_truncate(signed(&pmf)? as u8),
        })
    }

    /// Configure automatic reconnection.
    pub fn set_reconnect_config(&mut self, interval_second: i16, repeat_count: i16) -> AtResult<()> {
        debug!(interval_second, repeat_count, "configuring reconnection");
        let schema = self.basic(SET_RECONNECT);
        self.channel.run(
            &schema,
            &[Value::from(interval_second), Value::from(repeat_count)],
        )
    }

    /// Read the automatic reconnection settings.
    pub fn reconnect_config(&mut self) -> AtResult<ReconnectConfig> {
        let schema = self.basic(GET_RECONNECT);
        let [interval, repeat] = self.channel.query(&schema, &[], &RECONNECT_REPLY)?;
        Ok(ReconnectConfig {
            interval_second: signed(&interval)? as i16,
            repeat_count: signed(&repeat)? as i16,
        })
    }

    // ------------------------------------------------------------------------
    // TCP/IP
    // ------------------------------------------------------------------------

    /// Allow or forbid multiple simultaneous connections.
    pub fn set_multiple_connections(&mut self, allow: bool) -> AtResult<()> {
        debug!(allow, "setting multiple connections");
        let schema = self.basic(SET_MULTIPLE_CONNECTIONS);
        self.channel.run(&schema, &[Value::from(allow)])
    }

    /// Whether multiple simultaneous connections are allowed.
    pub fn multiple_connections(&mut self) -> AtResult<bool> {
        let schema = self.basic(GET_MULTIPLE_CONNECTIONS);
        let [mode] = self
            .channel
            .query(&schema, &[], &MULTIPLE_CONNECTIONS_REPLY)?;
        flag(&mode)
    }

    /// Start a server. Needs multiple connections enabled.
    pub fn create_server(&mut self, args: &CreateServerArgs<'_>) -> AtResult<()> {
        info!(port = ?args.port, server_type = ?args.server_type, "creating server");
        let schema = CREATE_SERVER.with_timeout(self.timeouts.server());
        let values = [
            Value::from(1i8),
            Value::from(args.port.unwrap_or(0)),
            Value::from(args.server_type),
            code_or_sentinel(args.ca_enabled.map(i8::from)),
        ];
        self.channel.run(&schema, &values)
    }

    /// Stop the server.
    pub fn delete_server(&mut self, args: &DeleteServerArgs<'_>) -> AtResult<()> {
        info!(close_all = ?args.close_all, "deleting server");
        let schema = DELETE_SERVER.with_timeout(self.timeouts.server());
        let values = [
            Value::from(0i8),
            code_or_sentinel(args.close_all.map(i8::from)),
            Value::from(args.server_type),
            code_or_sentinel(args.ca_enabled.map(i8::from)),
        ];
        self.channel.run(&schema, &values)
    }

    /// Read the server state.
    pub fn server_status(&mut self) -> AtResult<ServerStatus> {
        let schema = self.basic(GET_SERVER);
        self.channel
            .query_with(&schema, &[], SERVER_REPLY_PREFIX, |fields| {
                let mut status = ServerStatus {
                    enabled: flag(&fields.next(FieldKind::Bool)?)?,
                    ..ServerStatus::default()
                };
                if fields.is_empty() {
                    return Ok(status);
                }
                status.port = Some(unsigned(&fields.next(FieldKind::UInt16)?)? as u16);
                status.server_type = Some(text(&fields.next(FieldKind::Text)?));
                if !fields.is_empty() {
                    status.ca_enabled = Some(flag(&fields.next(FieldKind::Bool)?)?);
                }
                Ok(status)
            })
    }
}

fn code_or_sentinel(code: Option<i8>) -> Value<'static> {
    Value::from(code.unwrap_or(-1))
}

fn wire_code<T>(code: i64, what: &str, from_code: fn(i64) -> Option<T>) -> AtResult<T> {
    from_code(code)
        .ok_or_else(|| AtError::MalformedResponse(format!("unknown {} code {}", what, code)))
}

fn unexpected(value: &Value<'_>, wanted: &str) -> AtError {
    AtError::MalformedResponse(format!("expected {}, decoded {:?}", wanted, value))
}

fn signed(value: &Value<'_>) -> AtResult<i64> {
    value.as_i64().ok_or_else(|| unexpected(value, "a signed number"))
}

fn unsigned(value: &Value<'_>) -> AtResult<u64> {
    value.as_u64().ok_or_else(|| unexpected(value, "an unsigned number"))
}

fn flag(value: &Value<'_>) -> AtResult<bool> {
    value.as_bool().ok_or_else(|| unexpected(value, "a flag"))
}

fn text(value: &Value<'_>) -> String {
    value.as_text().unwrap_or_default().to_string()
}
