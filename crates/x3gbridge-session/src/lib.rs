//! # X3GBridge Session
//!
//! Session management and response translation for printers speaking
//! the binary x3g host protocol. Owns the lifecycle of a single serial
//! connection and renders binary query responses as RepRap-style text
//! replies for callers that expect the legacy line protocol.
//!
//! The G-code conversion engine and the framed wire transport are
//! consumed through the [`firmware::ConversionEngine`] and
//! [`communication::Transport`] seams.

pub mod baud;
pub mod communication;
pub mod firmware;
pub mod reply;
pub mod session;

pub use baud::{resolve_baud, DEFAULT_BAUD_RATE, SUPPORTED_BAUD_RATES};
pub use communication::{SerialOpener, SerialPortLink, Transport, TransportOpener};
pub use firmware::translate::{translate_response, ReplyTranslator};
pub use firmware::{CommandFrame, ConversionEngine, ResponseRecord, ResponseSink, StepPosition};
pub use reply::{ReplyAccumulator, REPLY_CAPACITY};
pub use session::{ConnectOptions, Session, SessionState};
