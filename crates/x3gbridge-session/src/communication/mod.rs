//! Transport seams
//!
//! The session never touches the wire directly: it opens a transport
//! through a [`TransportOpener`] and hands the resulting [`Transport`]
//! to the conversion engine for the duration of each command. Framing,
//! checksums, retransmission, and timeout policy all live below the
//! [`Transport::exchange`] call.

pub mod serial;

pub use serial::{SerialOpener, SerialPortLink};

use crate::firmware::{CommandFrame, ResponseRecord};
use std::io;
use x3gbridge_core::TransportError;

/// One open framed channel to the device
///
/// Exactly one command is in flight at a time; `exchange` blocks the
/// calling thread until the transport completes or times out. Dropping
/// the transport closes the underlying channel.
pub trait Transport: Send {
    /// Perform one request/response round trip
    fn exchange(&mut self, frame: &CommandFrame) -> Result<ResponseRecord, TransportError>;
}

/// Opens a [`Transport`] on a named port at a resolved baud rate
///
/// Injected into the session so tests can substitute stubs and
/// production code can supply a wire-protocol implementation.
pub trait TransportOpener {
    /// Open the port and build the framed channel on top of it
    fn open(&self, port: &str, baud_rate: u32) -> io::Result<Box<dyn Transport>>;
}
