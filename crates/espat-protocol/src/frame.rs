//! Response framing.
//!
//! A complete response on the wire looks like:
//!
//! ```text
//! \r\n <payload> \r\n <status> \r\n
//! ```
//!
//! The leading `\r\n` is consumed by the link as the preamble. What reaches
//! this module is `<payload>\r\n<status>\r\n`, where the status is `OK` or
//! `ERROR`. Payload boundaries are found by subtracting the fixed-length
//! `\r\nOK\r\n` suffix.

use crate::error::{AtError, AtResult};

/// Carriage return; submits a command and starts every frame.
pub const CR: u8 = b'\r';

/// Line feed.
pub const LF: u8 = b'\n';

/// Line terminator.
pub const CRLF: &[u8] = b"\r\n";

/// Success status token.
pub const STATUS_OK: &[u8] = b"OK";

/// Failure status token.
pub const STATUS_ERROR: &[u8] = b"ERROR";

/// Length of `OK\r\n`, the shortest acceptable response.
pub const OK_TAIL_LEN: usize = STATUS_OK.len() + CRLF.len();

/// Length of `\r\nOK\r\n`, the trailer after a payload.
pub const OK_FRAME_LEN: usize = CRLF.len() + OK_TAIL_LEN;

/// Check the status token at the end of a received response.
///
/// `OK` right before the final `\r\n` is success. `ERROR` is
/// [`AtError::StatusError`]. Fewer bytes than `OK\r\n` means the modem stopped
/// talking before the deadline.
pub fn check_status(received: &[u8]) -> AtResult<()> {
    if received.len() < OK_TAIL_LEN {
        return Err(AtError::ReadTimeout);
    }
    let body = received.strip_suffix(CRLF).ok_or_else(|| {
        AtError::MalformedResponse("response does not end with CRLF".to_string())
    })?;
    if body.ends_with(STATUS_OK) {
        Ok(())
    } else if body.ends_with(STATUS_ERROR) {
        Err(AtError::StatusError)
    } else {
        Err(AtError::MalformedResponse(format!(
            "unrecognized status in {:?}",
            String::from_utf8_lossy(&received[received.len().saturating_sub(8)..])
        )))
    }
}

/// Check the status and return the length of the payload preceding it.
pub fn payload_len(received: &[u8]) -> AtResult<usize> {
    check_status(received)?;
    if received.len() < OK_FRAME_LEN {
        return Err(AtError::MalformedResponse(
            "response has no payload".to_string(),
        ));
    }
    Ok(received.len() - OK_FRAME_LEN)
}
