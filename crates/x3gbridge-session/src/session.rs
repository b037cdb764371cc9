//! Connection lifecycle and per-line command workflow
//!
//! A [`Session`] owns one open transport to one printer, a log sink, and
//! a machine configuration snapshot. Connecting resolves the baud rate,
//! opens the transport, and probes the device for its current position;
//! each subsequent line is handed to the conversion engine, with every
//! exchange it triggers routed through the response translator into a
//! single bounded reply.
//!
//! Strictly synchronous and single-caller: one command is in flight at a
//! time and no internal locking is provided.

use crate::baud::resolve_baud;
use crate::communication::TransportOpener;
use crate::firmware::translate::ReplyTranslator;
use crate::firmware::ConversionEngine;
use crate::reply::ReplyAccumulator;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use x3gbridge_core::{load_machine_config, EngineError, Error, Machine, Result, TransportError};

/// Acknowledgment token seeding every reply line
const ACK: &str = "ok";

/// Textual probe issued after connecting to confirm liveness and report
/// the device's current position
const STATUS_PROBE: &str = "M114\n";

/// Connection state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport is open
    Disconnected,
    /// A transport is open and commands may be sent
    Connected,
}

/// Parameters for opening a connection
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Serial port name (e.g. "/dev/ttyACM0", "COM3")
    pub port: String,
    /// Requested baud rate; 0 selects the default
    pub baud_rate: u32,
    /// Optional machine overrides file
    pub config_path: Option<PathBuf>,
    /// Optional session transcript file; stderr when absent
    pub log_path: Option<PathBuf>,
}

impl ConnectOptions {
    /// Options for a port at the default baud rate
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: 0,
            config_path: None,
            log_path: None,
        }
    }

    /// Set the requested baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the machine overrides file
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set the session transcript file
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }
}

/// Session transcript sink: an owned file, or the process stderr stream
///
/// The stderr variant is never closed; an owned file is closed by drop
/// when the session disconnects or replaces it.
enum LogSink {
    Stderr,
    File(File),
}

impl LogSink {
    /// Open the requested transcript file, falling back to stderr
    fn open(path: &Path) -> LogSink {
        match File::create(path) {
            Ok(file) => LogSink::File(file),
            Err(e) => {
                tracing::warn!(
                    "Unable to open logfile ({}) for writing: {}",
                    path.display(),
                    e
                );
                LogSink::Stderr
            }
        }
    }

    fn write_line(&mut self, args: fmt::Arguments<'_>) {
        let result = match self {
            LogSink::Stderr => writeln!(std::io::stderr(), "{}", args),
            LogSink::File(file) => writeln!(file, "{}", args),
        };
        if let Err(e) = result {
            tracing::debug!("log sink write failed: {}", e);
        }
    }
}

/// One translated serial session to one printer
pub struct Session {
    opener: Box<dyn TransportOpener>,
    engine: Box<dyn ConversionEngine>,
    transport: Option<Box<dyn crate::communication::Transport>>,
    machine: Machine,
    reply: ReplyAccumulator,
    log: LogSink,
}

impl Session {
    /// Create a disconnected session around its collaborators
    pub fn new(opener: Box<dyn TransportOpener>, engine: Box<dyn ConversionEngine>) -> Self {
        Self {
            opener,
            engine,
            transport: None,
            machine: Machine::default(),
            reply: ReplyAccumulator::new(),
            log: LogSink::Stderr,
        }
    }

    /// Current connection state
    pub fn state(&self) -> SessionState {
        if self.transport.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Whether a transport is currently open
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// The machine snapshot in effect for this connection
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Open a connection and probe the device
    ///
    /// Any prior connection is torn down first. Log and configuration
    /// problems are soft (logged, defaults retained); an unsupported
    /// baud rate or a port that will not open aborts the attempt with
    /// nothing left half-open. On success the reply to an initial
    /// position probe is returned.
    pub fn connect(&mut self, options: &ConnectOptions) -> Result<String> {
        if options.port.is_empty() {
            return Err(Error::InvalidParameters {
                reason: "port name is empty".to_string(),
            });
        }

        self.disconnect();

        self.log = match &options.log_path {
            Some(path) => LogSink::open(path),
            None => LogSink::Stderr,
        };

        self.machine = Machine::default();
        if let Some(path) = &options.config_path {
            if let Err(e) = load_machine_config(path, &mut self.machine) {
                tracing::warn!("configuration file {} rejected: {}", path.display(), e);
                match e.line() {
                    Some(line) => self.log.write_line(format_args!(
                        "(line {}) configuration error in {}: {}",
                        line,
                        path.display(),
                        e
                    )),
                    None => self.log.write_line(format_args!(
                        "unable to load configuration file ({})",
                        path.display()
                    )),
                }
            }
        }

        let baud_rate = match resolve_baud(options.baud_rate) {
            Ok(baud_rate) => baud_rate,
            Err(e) => {
                self.log.write_line(format_args!("{}", e));
                self.disconnect();
                return Err(e);
            }
        };

        match self.opener.open(&options.port, baud_rate) {
            Ok(transport) => {
                self.transport = Some(transport);
            }
            Err(source) => {
                self.disconnect();
                return Err(Error::FailedToOpen {
                    port: options.port.clone(),
                    source,
                });
            }
        }

        self.log.write_line(format_args!(
            "connected to {} at {} using machine '{}'",
            options.port, baud_rate, self.machine.machine_type
        ));

        match self.send(STATUS_PROBE) {
            Ok(reply) => Ok(reply),
            Err(e) => {
                // A connect that cannot complete its probe leaves
                // nothing half-open behind.
                self.disconnect();
                Err(e)
            }
        }
    }

    /// Convert and dispatch one line, returning the accumulated reply
    ///
    /// Fails with [`Error::NotConnected`] while disconnected, before any
    /// transport access. A failed command leaves the session connected;
    /// the caller may retry or disconnect explicitly.
    pub fn send(&mut self, line: &str) -> Result<String> {
        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;

        self.reply.reset();
        self.reply.push(ACK);

        let mut sink = ReplyTranslator::new(&self.machine, &mut self.reply);
        let result = self.engine.convert_line(line, transport.as_mut(), &mut sink);

        match result {
            Ok(()) => {
                let text = self.reply.text();
                self.log.write_line(format_args!("reply = {}", text));
                Ok(text)
            }
            Err(EngineError::Transport(TransportError::Io(source))) => {
                self.log.write_line(format_args!("exchange failed: {}", source));
                Err(Error::Io(source))
            }
            Err(EngineError::Transport(e)) => {
                // Wire-level subtypes collapse for the caller; the
                // precise failure goes to the transcript.
                self.log.write_line(format_args!("exchange failed: {}", e));
                tracing::debug!("transport exchange failed: {}", e);
                Err(Error::Communication {
                    reason: e.to_string(),
                })
            }
            Err(EngineError::Failed { message }) => {
                self.log.write_line(format_args!("conversion failed: {}", message));
                Err(Error::Engine { message })
            }
        }
    }

    /// Tear down the connection
    ///
    /// Idempotent and infallible: drops the transport if one is open and
    /// restores the default log sink. Safe to call at any time.
    pub fn disconnect(&mut self) {
        self.transport = None;
        self.log = LogSink::Stderr;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.disconnect();
    }
}
