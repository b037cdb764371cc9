//! Error handling for X3GBridge
//!
//! Provides error types for all layers of the bridge:
//! - Configuration errors (machine overrides file)
//! - Transport errors (framed serial exchange)
//! - Engine errors (G-code conversion)
//! - Session errors (connection lifecycle, command dispatch)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Represents errors raised while loading a machine overrides file.
/// The session treats these as soft failures: they are logged and the
/// built-in defaults (plus any entries applied before the error) remain
/// in effect.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A line could not be parsed as a section header or `key=value` entry
    #[error("configuration syntax error at line {line}: unrecognized parameters")]
    Syntax {
        /// 1-based line number of the offending entry.
        line: u32,
    },

    /// The `machine_type` entry named an unknown machine preset
    #[error("unknown machine type '{machine}' at line {line}")]
    UnknownMachine {
        /// The unrecognized machine identifier.
        machine: String,
        /// 1-based line number of the offending entry.
        line: u32,
    },

    /// The file could not be read
    #[error("unable to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// The offending line number, if the error is tied to one.
    pub fn line(&self) -> Option<u32> {
        match self {
            ConfigError::Syntax { line } | ConfigError::UnknownMachine { line, .. } => Some(*line),
            ConfigError::Io(_) => None,
        }
    }
}

/// Transport error type
///
/// Failure modes of one framed request/response round trip with the
/// device. The wire-level subtypes exist so the transport layer can
/// report precisely; the session collapses them to a single
/// communication error for its caller and keeps the detail in the log.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Writing the command frame to the port failed
    #[error("serial write failed")]
    Write,

    /// Reading the response from the port failed
    #[error("serial read failed")]
    Read,

    /// The response could not be deframed
    #[error("response framing error")]
    Frame,

    /// The response checksum did not match
    #[error("response checksum mismatch")]
    Crc,

    /// Underlying system I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Conversion engine error type
///
/// Result of handing one line of text command language to the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A transport exchange triggered by the line failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The engine rejected or failed to process the line
    #[error("conversion failed: {message}")]
    Failed {
        /// Description of the engine failure.
        message: String,
    },
}

/// Main error type for X3GBridge
///
/// The caller-visible taxonomy used by the session's public API.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested baud rate is not in the supported set
    #[error("unsupported baud rate '{baud}'")]
    UnsupportedBaudRate {
        /// The unsupported rate as requested by the caller.
        baud: u32,
    },

    /// The serial port could not be opened
    #[error("failed to open port {port}: {source}")]
    FailedToOpen {
        /// The port name that failed to open.
        port: String,
        /// The underlying system error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid connection parameters
    #[error("invalid connection parameters: {reason}")]
    InvalidParameters {
        /// Why the parameters were rejected.
        reason: String,
    },

    /// A command was submitted while no connection is open
    #[error("not connected")]
    NotConnected,

    /// A transport exchange failed while processing a command
    #[error("serial communication error: {reason}")]
    Communication {
        /// Collapsed description of the wire-level failure.
        reason: String,
    },

    /// The conversion engine failed to process a command
    #[error("engine error: {message}")]
    Engine {
        /// Description of the engine failure.
        message: String,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error indicates a wire-level communication failure
    pub fn is_communication_error(&self) -> bool {
        matches!(self, Error::Communication { .. })
    }

    /// Check if this error is fatal for the connection attempt
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedBaudRate { .. }
                | Error::FailedToOpen { .. }
                | Error::InvalidParameters { .. }
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
