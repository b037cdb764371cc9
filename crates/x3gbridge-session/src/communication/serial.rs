//! Serial port plumbing
//!
//! Opens and configures the physical port for the framed firmware
//! protocol (8 data bits, no parity, one stop bit, no flow control) and
//! exposes it as a byte-level [`SerialPortLink`] for the wire-protocol
//! layer to build its [`Transport`](crate::communication::Transport) on.

use crate::communication::{Transport, TransportOpener};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Trait for serial port I/O operations
pub trait ReadWrite: Read + Write + Send {}
impl<T: Read + Write + Send> ReadWrite for T {}

/// Byte-level handle to an open serial port
pub struct SerialPortLink {
    port: Box<dyn ReadWrite>,
    name: String,
}

impl std::fmt::Debug for SerialPortLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortLink")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SerialPortLink {
    /// Open and configure a port for the firmware protocol
    pub fn open(port_name: &str, baud_rate: u32, timeout: Duration) -> io::Result<Self> {
        let builder = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None);

        match builder.open_native() {
            Ok(port) => Ok(Self {
                port: Box::new(port),
                name: port_name.to_string(),
            }),
            Err(e) => {
                tracing::warn!("Failed to open serial port {}: {}", port_name, e);
                // keep the kind so callers can tell a missing device
                // from a permission failure
                Err(e.into())
            }
        }
    }

    /// The port name this link was opened on
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write raw bytes to the port
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)
    }

    /// Read raw bytes from the port
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

/// Default per-exchange read timeout
///
/// Generous because the firmware stalls acknowledgments while its own
/// command buffer drains.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Production [`TransportOpener`] backed by a real serial port
///
/// Opens and configures the port, then hands the byte-level link to the
/// supplied constructor, which wraps it in the wire-protocol's
/// [`Transport`] implementation.
pub struct SerialOpener<F>
where
    F: Fn(SerialPortLink) -> Box<dyn Transport>,
{
    build_transport: F,
    timeout: Duration,
}

impl<F> SerialOpener<F>
where
    F: Fn(SerialPortLink) -> Box<dyn Transport>,
{
    /// Create an opener that frames exchanges with `build_transport`
    pub fn new(build_transport: F) -> Self {
        Self {
            build_transport,
            timeout: DEFAULT_EXCHANGE_TIMEOUT,
        }
    }

    /// Override the per-exchange read timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<F> TransportOpener for SerialOpener<F>
where
    F: Fn(SerialPortLink) -> Box<dyn Transport>,
{
    fn open(&self, port: &str, baud_rate: u32) -> io::Result<Box<dyn Transport>> {
        let link = SerialPortLink::open(port, baud_rate, self.timeout)?;
        Ok((self.build_transport)(link))
    }
}
