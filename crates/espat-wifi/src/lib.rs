//! ESP-AT WiFi Commands
//!
//! The WiFi command set of ESP-AT modems (mode, station join and query,
//! reconnection, multiple connections, server lifecycle), expressed as schema
//! constants and driven through an [`espat_link::CommandChannel`].
//!
//! # Example
//!
//! ```rust
//! use espat_link::ScriptedModem;
//! use espat_wifi::{Mode, WifiModem};
//!
//! let mut device = ScriptedModem::new();
//! device.respond_ok();
//! device.respond_payload("+CWMODE:1");
//!
//! let mut modem = WifiModem::new(&mut device);
//! modem.set_mode(Mode::Station).unwrap();
//! assert_eq!(modem.mode().unwrap(), Mode::Station);
//! drop(modem);
//!
//! assert_eq!(device.commands(), ["AT+CWMODE=1", "AT+CWMODE?"]);
//! ```

pub mod commands;
mod config;
mod modem;
mod types;

pub use config::*;
pub use modem::*;
pub use types::*;
