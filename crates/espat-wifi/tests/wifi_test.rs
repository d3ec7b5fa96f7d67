//! Integration tests for the WiFi command set against a scripted modem.
//!
//! Each test scripts the device's replies, runs catalog operations through a
//! `WifiModem`, then checks both the decoded results and the exact command
//! text that reached the device.

use std::time::Duration;

use espat_link::{LinkConfig, ScriptedModem};
use espat_protocol::{encode_into, AtError, CommandSchema, FieldKind, Value};
use espat_wifi::commands::CONNECTION_REPLY;
use espat_wifi::*;

fn modem(device: &mut ScriptedModem) -> WifiModem<&mut ScriptedModem> {
    WifiModem::new(device)
}

// ============================================================================
// Mode
// ============================================================================

#[test]
fn test_set_mode() {
    let mut device = ScriptedModem::new();
    device.respond_ok().respond_ok();

    let mut wifi = modem(&mut device);
    wifi.set_mode(Mode::Station).expect("set_mode should succeed");
    wifi.set_mode_with_auto_connect(Mode::SoftApStation, false)
        .expect("set_mode_with_auto_connect should succeed");
    drop(wifi);

    assert_eq!(device.commands(), ["AT+CWMODE=1", "AT+CWMODE=3,0"]);
}

#[test]
fn test_set_mode_rejected() {
    let mut device = ScriptedModem::new();
    device.respond_error();
    assert_eq!(modem(&mut device).set_mode(Mode::SoftAp), Err(AtError::StatusError));
}

#[test]
fn test_mode_query() {
    let mut device = ScriptedModem::new();
    device.respond_payload("+CWMODE:2");
    assert_eq!(modem(&mut device).mode().unwrap(), Mode::SoftAp);
    assert_eq!(device.last_command(), Some("AT+CWMODE?"));
}

#[test]
fn test_mode_query_unknown_code() {
    let mut device = ScriptedModem::new();
    device.respond_payload("+CWMODE:7");
    assert!(matches!(
        modem(&mut device).mode(),
        Err(AtError::MalformedResponse(_))
    ));
}

// ============================================================================
// Station
// ============================================================================

#[test]
fn test_state_query() {
    let mut device = ScriptedModem::new();
    device.respond_payload("+CWSTATE:2,\"MySSID\"");
    device.respond_payload("+CWSTATE:0,\"\"");

    let mut wifi = modem(&mut device);
    let state = wifi.state().unwrap();
    assert_eq!(state.state, State::ConnectedAssigned);
    assert_eq!(state.ssid.as_deref(), Some("MySSID"));

    let state = wifi.state().unwrap();
    assert_eq!(state.state, State::NotConnected);
    assert_eq!(state.ssid, None);
}

#[test]
fn test_connect() {
    let mut device = ScriptedModem::new();
    device.respond_ok().respond_ok();

    let mut wifi = modem(&mut device);
    wifi.connect("MySSID", "password").unwrap();
    wifi.connect_saved().unwrap();
    drop(wifi);

    assert_eq!(device.commands(), ["AT+CWJAP=\"MySSID\",\"password\"", "AT+CWJAP"]);
    assert!(device.timeout_history().contains(&Duration::from_millis(3000)));
    assert!(device.timeout_history().contains(&Duration::from_millis(1000)));
}

#[test]
fn test_connect_with_elides_absent_arguments() {
    let mut device = ScriptedModem::new();
    device.respond_ok().respond_ok();

    let mut wifi = modem(&mut device);
    wifi.connect_with(&ConnectArgs::new("MySSID", "password")).unwrap();
    wifi.connect_with(&ConnectArgs {
        ssid: Some("MySSID"),
        bssid: Some("aa:bb:cc:dd:ee:ff"),
        pci_en: Some(PciAuthentication::ExcludeOpenWep),
        scan_mode: Some(ScanMode::Full),
        timeout: Some(15),
        pmf: Some(Pmf::SUPPORTED | Pmf::REQUIRED),
        ..ConnectArgs::default()
    })
    .unwrap();
    drop(wifi);

    assert_eq!(
        device.commands(),
        [
            "AT+CWJAP=\"MySSID\",\"password\",,,,,,,",
            "AT+CWJAP=\"MySSID\",,\"aa:bb:cc:dd:ee:ff\",1,,,1,15,3",
        ]
    );
}

#[test]
fn test_connection_query() {
    let mut device = ScriptedModem::new();
    device.respond_payload("+CWJAP:\"MySSID\",\"aa:bb:cc:dd:ee:ff\",6,-40,0,1,3,0,1");

    let connection = modem(&mut device).connection().unwrap();
    assert_eq!(
        connection,
        Connection {
            ssid: "MySSID".to_string(),
            bssid: "aa:bb:cc:dd:ee:ff".to_string(),
            channel: 6,
            rssi: -40,
            pci_en: PciAuthentication::IncludeOpenWep,
            reconn_interval: 1,
            listen_interval: 3,
            scan_mode: ScanMode::Fast,
            pmf: Pmf::SUPPORTED,
        }
    );
}

#[test]
fn test_connection_query_truncated() {
    let mut device = ScriptedModem::new();
    device.respond_payload("+CWJAP:\"MySSID\",\"aa:bb:cc:dd:ee:ff\",6");
    assert!(matches!(
        modem(&mut device).connection(),
        Err(AtError::MalformedResponse(_))
    ));
}

#[test]
fn test_connection_query_not_joined() {
    let mut device = ScriptedModem::new();
    device.respond_raw(b"\r\nNo AP\r\nOK\r\n");
    assert!(matches!(
        modem(&mut device).connection(),
        Err(AtError::MalformedResponse(_))
    ));
}

#[test]
fn test_connection_reply_encoded_from_catalog_schema() {
    const REPLY_FIELDS: &[FieldKind] = &CONNECTION_REPLY.fields;
    let schema = CommandSchema::new(CONNECTION_REPLY.prefix, REPLY_FIELDS);
    let values = [
        Value::from("Cafe, Upstairs"),
        Value::from("aa:bb:cc:dd:ee:ff"),
        Value::from(11i8),
        Value::from(-72i8),
        Value::from(true),
        Value::from(7200i16),
        Value::from(100i16),
        Value::from(ScanMode::Full.code()),
        Value::from((Pmf::SUPPORTED | Pmf::REQUIRED).code()),
    ];
    let mut buf = [0u8; 128];
    let len = encode_into(&mut buf, &schema, &values).unwrap();
    let payload = std::str::from_utf8(&buf[..len]).unwrap();

    let mut device = ScriptedModem::new();
    device.respond_payload(payload);
    assert_eq!(
        modem(&mut device).connection().unwrap(),
        Connection {
            ssid: "Cafe, Upstairs".to_string(),
            bssid: "aa:bb:cc:dd:ee:ff".to_string(),
            channel: 11,
            rssi: -72,
            pci_en: PciAuthentication::ExcludeOpenWep,
            reconn_interval: 7200,
            listen_interval: 100,
            scan_mode: ScanMode::Full,
            pmf: Pmf::SUPPORTED | Pmf::REQUIRED,
        }
    );
}

#[test]
fn test_reconnect_config() {
    let mut device = ScriptedModem::new();
    device.respond_ok().respond_payload("+CWRECONNCFG:7200,1000");

    let mut wifi = modem(&mut device);
    wifi.set_reconnect_config(7200, 1000).unwrap();
    let config = wifi.reconnect_config().unwrap();
    drop(wifi);

    assert_eq!(config, ReconnectConfig { interval_second: 7200, repeat_count: 1000 });
    assert_eq!(device.commands(), ["AT+CWRECONNCFG=7200,1000", "AT+CWRECONNCFG?"]);
}

// ============================================================================
// TCP/IP
// ============================================================================

#[test]
fn test_multiple_connections() {
    let mut device = ScriptedModem::new();
    device.respond_ok().respond_payload("+CIPMUX:1");

    let mut wifi = modem(&mut device);
    wifi.set_multiple_connections(true).unwrap();
    assert!(wifi.multiple_connections().unwrap());
    drop(wifi);

    assert_eq!(device.commands(), ["AT+CIPMUX=1", "AT+CIPMUX?"]);
}

#[test]
fn test_server_lifecycle() {
    let mut device = ScriptedModem::new();
    device.respond_ok().respond_ok().respond_ok();

    let mut wifi = modem(&mut device);
    wifi.create_server(&CreateServerArgs {
        port: Some(8080),
        server_type: Some("TCP"),
        ca_enabled: None,
    })
    .unwrap();
    wifi.create_server(&CreateServerArgs::default()).unwrap();
    wifi.delete_server(&DeleteServerArgs {
        close_all: Some(true),
        ..DeleteServerArgs::default()
    })
    .unwrap();
    drop(wifi);

    assert_eq!(
        device.commands(),
        [
            "AT+CIPSERVER=1,8080,\"TCP\",",
            "AT+CIPSERVER=1,,,",
            "AT+CIPSERVER=0,1,,",
        ]
    );
}

#[test]
fn test_server_status() {
    let mut device = ScriptedModem::new();
    device
        .respond_payload("+CIPSERVER:1,333,\"TCP\",0")
        .respond_payload("+CIPSERVER:1,8443,\"SSL\"")
        .respond_payload("+CIPSERVER:0");

    let mut wifi = modem(&mut device);
    assert_eq!(
        wifi.server_status().unwrap(),
        ServerStatus {
            enabled: true,
            port: Some(333),
            server_type: Some("TCP".to_string()),
            ca_enabled: Some(false),
        }
    );

    let status = wifi.server_status().unwrap();
    assert_eq!(status.port, Some(8443));
    assert_eq!(status.server_type.as_deref(), Some("SSL"));
    assert_eq!(status.ca_enabled, None);

    assert_eq!(wifi.server_status().unwrap(), ServerStatus::default());
}

// ============================================================================
// Link failures and configuration
// ============================================================================

#[test]
fn test_link_failures_surface_unchanged() {
    let mut device = ScriptedModem::new();
    device.respond_silence();
    device.corrupt_echo_at(0);

    let mut wifi = modem(&mut device);
    let err = wifi.mode().unwrap_err();
    assert!(matches!(err, AtError::EchoMismatch { confirmed: 0, .. }));
    assert!(err.is_link_error());
}

#[test]
fn test_silent_modem_times_out() {
    let mut device = ScriptedModem::new();
    device.respond_silence();
    assert_eq!(modem(&mut device).state(), Err(AtError::ReadTimeout));
    assert_eq!(device.read_timeout(), LinkConfig::default().read_timeout());
}

#[test]
fn test_configured_timeouts_and_buffer() {
    let config = ModemConfig::from_yaml_str(
        "link:\n  buffer_capacity: 16\ntimeouts:\n  basic_ms: 200\n",
    )
    .unwrap();

    let mut device = ScriptedModem::new();
    device.respond_payload("+CWMODE:1");

    let mut wifi = WifiModem::with_config(&mut device, config);
    assert_eq!(wifi.command_channel().capacity(), 16);
    assert_eq!(wifi.mode().unwrap(), Mode::Station);
    assert_eq!(
        wifi.connect("a-long-network-name", "secret"),
        Err(AtError::EncodingOverflow { capacity: 16 })
    );
    drop(wifi);

    assert!(device.timeout_history().contains(&Duration::from_millis(200)));
    assert_eq!(device.commands(), ["AT+CWMODE?"]);
}
