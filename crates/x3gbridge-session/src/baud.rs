//! Baud rate negotiation table
//!
//! Maps a caller-requested baud rate to the effective rate the serial
//! port is opened at. The firmware side only speaks a fixed set of
//! rates, so anything outside the table is rejected outright rather
//! than rounded to a neighbour.

use x3gbridge_core::{Error, Result};

/// Default baud rate used when the caller requests 0
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Rates the firmware protocol supports
pub const SUPPORTED_BAUD_RATES: [u32; 8] =
    [4_800, 9_600, 14_400, 19_200, 28_800, 38_400, 57_600, 115_200];

/// Resolve a requested baud rate to the rate the port is opened at
///
/// `0` selects [`DEFAULT_BAUD_RATE`]; the resolved value (not the
/// literal 0) is what the session reports in its log. Any rate outside
/// [`SUPPORTED_BAUD_RATES`] fails with
/// [`Error::UnsupportedBaudRate`] naming the requested value.
pub fn resolve_baud(requested: u32) -> Result<u32> {
    if requested == 0 {
        return Ok(DEFAULT_BAUD_RATE);
    }
    if SUPPORTED_BAUD_RATES.contains(&requested) {
        Ok(requested)
    } else {
        Err(Error::UnsupportedBaudRate { baud: requested })
    }
}
