//! Firmware protocol types and seams
//!
//! Models just enough of the binary host protocol for the session
//! layer: the outgoing command frame (inspected for its opcode and
//! query fields), the decoded response record the translator reads,
//! and the trait seam to the external G-code conversion engine.
//!
//! Frame construction, wire framing, and checksums belong to the layers
//! on either side of these types.

pub mod translate;

use crate::communication::Transport;
use x3gbridge_core::EngineError;

/// Host command opcodes the translator dispatches on
pub mod opcode {
    /// Compound extruder/platform query; the query sub-opcode selects
    /// the specific reading
    pub const TOOL_QUERY: u8 = 10;
    /// Query the current position of all five axes
    pub const GET_EXTENDED_POSITION: u8 = 21;
}

/// Sub-opcodes of [`opcode::TOOL_QUERY`]
pub mod query {
    /// Firmware version information
    pub const FIRMWARE_VERSION: u8 = 0;
    /// Current extruder temperature
    pub const EXTRUDER_TEMPERATURE: u8 = 2;
    /// Is the extruder at target temperature
    pub const EXTRUDER_READY: u8 = 22;
    /// Current build platform temperature
    pub const PLATFORM_TEMPERATURE: u8 = 30;
    /// Extruder target temperature
    pub const EXTRUDER_TARGET_TEMPERATURE: u8 = 32;
    /// Build platform target temperature
    pub const PLATFORM_TARGET_TEMPERATURE: u8 = 33;
    /// Is the build platform at target temperature
    pub const PLATFORM_READY: u8 = 35;
    /// Extruder status flags
    pub const EXTRUDER_STATUS: u8 = 36;
    /// PID controller state
    pub const PID_STATE: u8 = 37;
}

/// Byte offsets of the fields the translator inspects in an outgoing frame
const COMMAND_OFFSET: usize = 2;
const EXTRUDER_ID_OFFSET: usize = 3;
const QUERY_COMMAND_OFFSET: usize = 4;

/// One outgoing framed command packet
///
/// Owned bytes as produced by the conversion engine. Accessors read the
/// fixed field offsets; a frame too short for a field reads as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: Vec<u8>,
}

impl CommandFrame {
    /// Wrap an already-framed packet
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw packet bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The command opcode
    pub fn opcode(&self) -> u8 {
        self.byte_at(COMMAND_OFFSET)
    }

    /// The extruder the command addresses
    pub fn extruder_id(&self) -> u8 {
        self.byte_at(EXTRUDER_ID_OFFSET)
    }

    /// The query sub-opcode of a [`opcode::TOOL_QUERY`] frame
    pub fn query_command(&self) -> u8 {
        self.byte_at(QUERY_COMMAND_OFFSET)
    }

    fn byte_at(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }
}

/// A 5-axis position in raw device step units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepPosition {
    /// X axis steps
    pub x: i32,
    /// Y axis steps
    pub y: i32,
    /// Z axis steps
    pub z: i32,
    /// A axis (first extruder) steps
    pub a: i32,
    /// B axis (second extruder) steps
    pub b: i32,
}

impl StepPosition {
    /// Create a step position
    pub fn new(x: i32, y: i32, z: i32, a: i32, b: i32) -> Self {
        Self { x, y, z, a, b }
    }
}

/// Decoded fields of one device response
///
/// Populated by the transport layer after deframing; only the fields
/// the response translator reads are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseRecord {
    /// Temperature reading in degrees Celsius
    pub temperature: u16,
    /// Current position in raw step units
    pub position: StepPosition,
}

impl ResponseRecord {
    /// A response carrying a temperature reading
    pub fn with_temperature(temperature: u16) -> Self {
        Self {
            temperature,
            ..Self::default()
        }
    }

    /// A response carrying a position reading
    pub fn with_position(position: StepPosition) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Receives every decoded response together with the command frame that
/// produced it
///
/// The session registers its translator behind this trait so each
/// exchange the engine performs contributes its fragment to the reply.
pub trait ResponseSink {
    /// Called once per completed transport exchange
    fn on_response(&mut self, frame: &CommandFrame, record: &ResponseRecord);
}

/// The external G-code conversion engine
///
/// Translates one line of text command language into zero or more
/// binary command frames, exchanging each over `transport` and routing
/// every decoded response through `sink` before returning.
pub trait ConversionEngine {
    /// Convert and dispatch one line
    fn convert_line(
        &mut self,
        line: &str,
        transport: &mut dyn Transport,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_field_accessors() {
        let frame = CommandFrame::from_bytes(vec![0xd5, 0x03, 10, 1, 2]);
        assert_eq!(frame.opcode(), opcode::TOOL_QUERY);
        assert_eq!(frame.extruder_id(), 1);
        assert_eq!(frame.query_command(), query::EXTRUDER_TEMPERATURE);
    }

    #[test]
    fn test_short_frame_reads_zero() {
        let frame = CommandFrame::from_bytes(vec![0xd5]);
        assert_eq!(frame.opcode(), 0);
        assert_eq!(frame.query_command(), 0);
    }
}
