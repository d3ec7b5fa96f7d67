//! The WiFi command catalog.
//!
//! Each command is a schema constant. Timeouts here are the stock ones;
//! [`WifiModem`](crate::WifiModem) replaces them with the configured values.

use std::time::Duration;

use espat_protocol::{CommandSchema, FieldKind::*, ResponseSchema};

// ============================================================================
// Mode
// ============================================================================

/// `AT+CWMODE=<mode>`
pub const SET_MODE: CommandSchema = CommandSchema::new("AT+CWMODE=", &[Int8]);

/// `AT+CWMODE=<mode>,<auto_connect>`
pub const SET_MODE_AUTO_CONNECT: CommandSchema = CommandSchema::new("AT+CWMODE=", &[Int8, Bool]);

/// `AT+CWMODE?`
pub const GET_MODE: CommandSchema = CommandSchema::bare("AT+CWMODE?");

/// `+CWMODE:<mode>`
pub const MODE_REPLY: ResponseSchema<1> = ResponseSchema::new("+CWMODE:", [Int8]);

// ============================================================================
// Station
// ============================================================================

/// `AT+CWSTATE?`
pub const GET_STATE: CommandSchema = CommandSchema::bare("AT+CWSTATE?");

/// `+CWSTATE:<state>,<"ssid">`
pub const STATE_REPLY: ResponseSchema<2> = ResponseSchema::new("+CWSTATE:", [Int8, Text]);

/// `AT+CWJAP`: join the saved AP.
pub const JOIN_SAVED: CommandSchema =
    CommandSchema::bare("AT+CWJAP").with_timeout(Duration::from_millis(1000));

/// `AT+CWJAP=<"ssid">,<"pwd">`
pub const JOIN: CommandSchema =
    CommandSchema::new("AT+CWJAP=", &[Text, Text]).with_timeout(Duration::from_millis(3000));

/// `AT+CWJAP=[<ssid>],[<pwd>][,<bssid>][,<pci_en>][,<reconn_interval>][,<listen_interval>][,<scan_mode>][,<jap_timeout>][,<pmf>]`
pub const JOIN_WITH: CommandSchema = CommandSchema::new(
    "AT+CWJAP=",
    &[Text, Text, Text, Int8, Int16, Int16, Int8, Int16, Int8],
)
.optional()
.with_timeout(Duration::from_millis(3000));

/// `AT+CWJAP?`
pub const GET_CONNECTION: CommandSchema = CommandSchema::bare("AT+CWJAP?");

/// `+CWJAP:<ssid>,<bssid>,<channel>,<rssi>,<pci_en>,<reconn_interval>,<listen_interval>,<scan_mode>,<pmf>`
pub const CONNECTION_REPLY: ResponseSchema<9> = ResponseSchema::new(
    "+CWJAP:",
    [Text, Text, Int8, Int8, Bool, Int16, Int16, Int8, Int8],
);

/// `AT+CWRECONNCFG=<interval_second>,<repeat_count>`
pub const SET_RECONNECT: CommandSchema = CommandSchema::new("AT+CWRECONNCFG=", &[Int16, Int16]);

/// `AT+CWRECONNCFG?`
pub const GET_RECONNECT: CommandSchema = CommandSchema::bare("AT+CWRECONNCFG?");

/// `+CWRECONNCFG:<interval_second>,<repeat_count>`
pub const RECONNECT_REPLY: ResponseSchema<2> = ResponseSchema::new("+CWRECONNCFG:", [Int16, Int16]);

// ============================================================================
// TCP/IP
// ============================================================================

/// `AT+CIPMUX=<mode>`
pub const SET_MULTIPLE_CONNECTIONS: CommandSchema = CommandSchema::new("AT+CIPMUX=", &[Bool]);

/// `AT+CIPMUX?`
pub const GET_MULTIPLE_CONNECTIONS: CommandSchema = CommandSchema::bare("AT+CIPMUX?");

/// `+CIPMUX:<mode>`
pub const MULTIPLE_CONNECTIONS_REPLY: ResponseSchema<1> = ResponseSchema::new("+CIPMUX:", [Bool]);

/// `AT+CIPSERVER=1[,<port>][,<"type">][,<CA enable>]`
///
/// The leading mode field is always 1 and never elided.
pub const CREATE_SERVER: CommandSchema =
    CommandSchema::new("AT+CIPSERVER=", &[Int8, UInt16, Text, Int8])
        .optional()
        .with_timeout(Duration::from_millis(3000));

/// `AT+CIPSERVER=0[,<close_all>][,<"type">][,<CA enable>]`
pub const DELETE_SERVER: CommandSchema =
    CommandSchema::new("AT+CIPSERVER=", &[Int8, Int8, Text, Int8])
        .optional()
        .with_timeout(Duration::from_millis(3000));

/// `AT+CIPSERVER?`
pub const GET_SERVER: CommandSchema = CommandSchema::bare("AT+CIPSERVER?");

/// Prefix of `+CIPSERVER:<mode>[,<port>,<"type">][,<CA enable>]`; the field
/// count depends on the mode.
pub const SERVER_REPLY_PREFIX: &str = "+CIPSERVER:";
