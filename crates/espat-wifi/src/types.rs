//! WiFi enums and records.
//!
//! Enum discriminants are the numeric codes the modem uses on the wire.
//! Optional arguments are `Option`s; `None` is sent as the field's sentinel
//! and elided from the command.

// ============================================================================
// Enums
// ============================================================================

/// Generate `code()` and `from_code()` for a wire-coded enum.
macro_rules! wire_code {
    ($name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl $name {
            /// The wire code.
            pub fn code(self) -> i8 {
                self as i8
            }

            /// Parse a wire code.
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

/// WiFi operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Mode {
    /// RF disabled.
    Disabled = 0,
    /// Station.
    Station = 1,
    /// Soft access point.
    SoftAp = 2,
    /// Soft access point and station together.
    SoftApStation = 3,
}

wire_code!(Mode {
    Disabled = 0,
    Station = 1,
    SoftAp = 2,
    SoftApStation = 3,
});

/// Station connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum State {
    /// No connection attempted.
    NotConnected = 0,
    /// Associated with an AP, no IPv4 address yet.
    ConnectedUnassigned = 1,
    /// Associated with an AP and holding an IPv4 address.
    ConnectedAssigned = 2,
    /// Connecting or reconnecting.
    Reconnecting = 3,
    /// Disconnected.
    Disconnected = 4,
}

wire_code!(State {
    NotConnected = 0,
    ConnectedUnassigned = 1,
    ConnectedAssigned = 2,
    Reconnecting = 3,
    Disconnected = 4,
});

impl State {
    /// Whether the station is associated with an AP.
    pub fn is_connected(self) -> bool {
        matches!(self, State::ConnectedUnassigned | State::ConnectedAssigned)
    }
}

/// Which encryption methods the station accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum PciAuthentication {
    /// Any AP, including OPEN and WEP.
    IncludeOpenWep = 0,
    /// Any AP except OPEN and WEP.
    ExcludeOpenWep = 1,
}

wire_code!(PciAuthentication {
    IncludeOpenWep = 0,
    ExcludeOpenWep = 1,
});

impl From<bool> for PciAuthentication {
    fn from(enabled: bool) -> Self {
        if enabled {
            PciAuthentication::ExcludeOpenWep
        } else {
            PciAuthentication::IncludeOpenWep
        }
    }
}

/// How the station scans for its AP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ScanMode {
    /// Stop at the first matching AP.
    Fast = 0,
    /// Scan every channel and pick the strongest AP.
    Full = 1,
}

wire_code!(ScanMode { Fast = 0, Full = 1 });

/// Protected Management Frames capability bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pmf(u8);

impl Pmf {
    /// PMF off.
    pub const DISABLED: Pmf = Pmf(0);
    /// PMF capable; preferred when the peer supports it.
    pub const SUPPORTED: Pmf = Pmf(1 << 0);
    /// PMF required; non-PMF peers are refused.
    pub const REQUIRED: Pmf = Pmf(1 << 1);

    /// Build from raw bits. Unknown bits are dropped.
    pub fn from_bits_truncate(bits: u8) -> Self {
        Pmf(bits & (Self::SUPPORTED.0 | Self::REQUIRED.0))
    }

    /// Raw bits.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub fn contains(self, other: Pmf) -> bool {
        self.0 & other.0 == other.0
    }

    /// The wire code.
    pub fn code(self) -> i8 {
        self.0 as i8
    }
}

impl std::ops::BitOr for Pmf {
    type Output = Pmf;

    fn bitor(self, rhs: Pmf) -> Pmf {
        Pmf(self.0 | rhs.0)
    }
}

// ============================================================================
// Replies
// ============================================================================

/// The AP the station is joined to, from `AT+CWJAP?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// SSID of the AP.
    pub ssid: String,
    /// MAC address of the AP.
    pub bssid: String,
    /// Channel.
    pub channel: i8,
    /// Signal strength in dBm.
    pub rssi: i8,
    /// Encryption methods accepted.
    pub pci_en: PciAuthentication,
    /// Seconds between reconnection attempts.
    pub reconn_interval: i16,
    /// Beacon intervals between listens.
    pub listen_interval: i16,
    /// Scan mode.
    pub scan_mode: ScanMode,
    /// PMF bits.
    pub pmf: Pmf,
}

/// Station state and SSID, from `AT+CWSTATE?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationState {
    /// Connection state.
    pub state: State,
    /// SSID being used, `None` when empty.
    pub ssid: Option<String>,
}

/// Automatic reconnection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconnectConfig {
    /// Seconds between attempts; 0 disables reconnection. At most 7200.
    pub interval_second: i16,
    /// Number of attempts. At most 1000.
    pub repeat_count: i16,
}

/// Server state, from `AT+CIPSERVER?`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerStatus {
    /// Whether a server is running.
    pub enabled: bool,
    /// Listening port.
    pub port: Option<u16>,
    /// `TCP`, `TCPv6`, `SSL`, or `SSLv6`.
    pub server_type: Option<String>,
    /// Whether CA verification is on.
    pub ca_enabled: Option<bool>,
}

// ============================================================================
// Arguments
// ============================================================================

/// Arguments for a full `AT+CWJAP=` join. Every field may be left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectArgs<'a> {
    /// SSID of the AP.
    pub ssid: Option<&'a str>,
    /// Password, at most 63 ASCII bytes.
    pub pwd: Option<&'a str>,
    /// MAC address of the AP; needed when several APs share an SSID.
    pub bssid: Option<&'a str>,
    /// Encryption methods accepted.
    pub pci_en: Option<PciAuthentication>,
    /// Seconds between reconnection attempts, at most 7200.
    pub reconn_interval: Option<i16>,
    /// Beacon intervals between listens, 1 to 100.
    pub listen_interval: Option<i16>,
    /// Scan mode.
    pub scan_mode: Option<ScanMode>,
    /// Join timeout in seconds, 3 to 600.
    pub timeout: Option<i16>,
    /// PMF bits.
    pub pmf: Option<Pmf>,
}

impl<'a> ConnectArgs<'a> {
    /// Join `ssid` with `pwd`, leaving everything else to the modem.
    pub fn new(ssid: &'a str, pwd: &'a str) -> Self {
        ConnectArgs {
            ssid: Some(ssid),
            pwd: Some(pwd),
            ..ConnectArgs::default()
        }
    }
}

/// Arguments for starting a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateServerArgs<'a> {
    /// Port, 333 when left out. Port 0 cannot be requested.
    pub port: Option<u16>,
    /// `TCP`, `TCPv6`, `SSL`, or `SSLv6`.
    pub server_type: Option<&'a str>,
    /// Whether CA verification is on.
    pub ca_enabled: Option<bool>,
}

/// Arguments for stopping a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteServerArgs<'a> {
    /// Also close every client connection.
    pub close_all: Option<bool>,
    /// `TCP`, `TCPv6`, `SSL`, or `SSLv6`.
    pub server_type: Option<&'a str>,
    /// Whether CA verification is on.
    pub ca_enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_codes() {
        assert_eq!(Mode::SoftApStation.code(), 3);
        assert_eq!(Mode::from_code(1), Some(Mode::Station));
        assert_eq!(Mode::from_code(4), None);
        assert_eq!(Mode::from_code(-1), None);
    }

    #[test]
    fn test_state_codes() {
        assert_eq!(State::from_code(2), Some(State::ConnectedAssigned));
        assert!(State::ConnectedUnassigned.is_connected());
        assert!(!State::Reconnecting.is_connected());
    }

    #[test]
    fn test_pmf_bits() {
        let both = Pmf::SUPPORTED | Pmf::REQUIRED;
        assert_eq!(both.code(), 3);
        assert!(both.contains(Pmf::REQUIRED));
        assert!(!Pmf::SUPPORTED.contains(Pmf::REQUIRED));
        assert_eq!(Pmf::from_bits_truncate(0xFF), both);
        assert_eq!(Pmf::default(), Pmf::DISABLED);
    }

    #[test]
    fn test_pci_from_flag() {
        assert_eq!(PciAuthentication::from(true), PciAuthentication::ExcludeOpenWep);
        assert_eq!(PciAuthentication::from(false).code(), 0);
    }
}
