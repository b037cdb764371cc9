//! Binary response to RepRap-style text translation
//!
//! Inspects the opcode of the command that was sent and the decoded
//! response record, and appends the matching human-readable fragment to
//! the active reply. Commands with no textual representation contribute
//! nothing; the acknowledgment token is seeded by the session before
//! any translation runs.

use crate::firmware::{opcode, query, CommandFrame, ResponseRecord, ResponseSink};
use crate::reply::ReplyAccumulator;
use std::fmt::Write;
use x3gbridge_core::Machine;

/// Append the textual fragment for one completed exchange
///
/// Pure function of the outgoing frame, the decoded record, and the
/// machine snapshot; performs no I/O. A full accumulator drops the
/// fragment silently.
pub fn translate_response(
    machine: &Machine,
    frame: &CommandFrame,
    record: &ResponseRecord,
    reply: &mut ReplyAccumulator,
) {
    match frame.opcode() {
        opcode::TOOL_QUERY => {
            translate_tool_query(machine, frame, record, reply);
        }
        opcode::GET_EXTENDED_POSITION => {
            let pos = record.position;
            let _ = write!(
                reply,
                " X:{:.2} Y:{:.2} Z:{:.2} A:{:.2} B:{:.2}",
                machine.x.steps_to_mm(pos.x),
                machine.y.steps_to_mm(pos.y),
                machine.z.steps_to_mm(pos.z),
                machine.a.steps_to_mm(pos.a),
                machine.b.steps_to_mm(pos.b),
            );
        }
        // every other command is acknowledgment-only
        _ => {}
    }
}

fn translate_tool_query(
    machine: &Machine,
    frame: &CommandFrame,
    record: &ResponseRecord,
    reply: &mut ReplyAccumulator,
) {
    match frame.query_command() {
        query::EXTRUDER_TEMPERATURE => {
            // like "T:170", or "T1:170" on multi-extruder machines
            reply.push(" T");
            if machine.has_multiple_extruders() {
                let _ = write!(reply, "{}", frame.extruder_id());
            }
            let _ = write!(reply, ":{}", record.temperature);
        }
        query::PLATFORM_TEMPERATURE => {
            let _ = write!(reply, " B:{}", record.temperature);
        }
        query::EXTRUDER_TARGET_TEMPERATURE | query::PLATFORM_TARGET_TEMPERATURE => {
            let _ = write!(reply, " /{}", record.temperature);
        }
        // Readiness and version queries acknowledge without text.
        query::FIRMWARE_VERSION | query::EXTRUDER_READY | query::PLATFORM_READY => {}
        // Status and PID queries are intentionally inert for now; the
        // reply format reserves no fragment for them.
        query::EXTRUDER_STATUS | query::PID_STATE => {}
        // Unrecognized queries are ignored, not errors.
        _ => {}
    }
}

/// [`ResponseSink`] that routes every exchange through
/// [`translate_response`] into one shared accumulator
pub struct ReplyTranslator<'a> {
    machine: &'a Machine,
    reply: &'a mut ReplyAccumulator,
}

impl<'a> ReplyTranslator<'a> {
    /// Bind a translator to the machine snapshot and active reply
    pub fn new(machine: &'a Machine, reply: &'a mut ReplyAccumulator) -> Self {
        Self { machine, reply }
    }
}

impl ResponseSink for ReplyTranslator<'_> {
    fn on_response(&mut self, frame: &CommandFrame, record: &ResponseRecord) {
        translate_response(self.machine, frame, record, self.reply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::StepPosition;

    fn tool_query_frame(query_command: u8, extruder_id: u8) -> CommandFrame {
        CommandFrame::from_bytes(vec![0xd5, 0x03, opcode::TOOL_QUERY, extruder_id, query_command])
    }

    fn position_frame() -> CommandFrame {
        CommandFrame::from_bytes(vec![0xd5, 0x01, opcode::GET_EXTENDED_POSITION])
    }

    fn translate(machine: &Machine, frame: &CommandFrame, record: &ResponseRecord) -> String {
        let mut reply = ReplyAccumulator::new();
        translate_response(machine, frame, record, &mut reply);
        reply.text()
    }

    #[test]
    fn test_extruder_temperature_single_extruder() {
        let machine = Machine::preset("r2").unwrap();
        let frame = tool_query_frame(query::EXTRUDER_TEMPERATURE, 0);
        let record = ResponseRecord::with_temperature(170);
        assert_eq!(translate(&machine, &frame, &record), " T:170");
    }

    #[test]
    fn test_extruder_temperature_dual_extruder() {
        let machine = Machine::preset("r2x").unwrap();
        let frame = tool_query_frame(query::EXTRUDER_TEMPERATURE, 1);
        let record = ResponseRecord::with_temperature(170);
        assert_eq!(translate(&machine, &frame, &record), " T1:170");
    }

    #[test]
    fn test_platform_temperature() {
        let machine = Machine::default();
        let frame = tool_query_frame(query::PLATFORM_TEMPERATURE, 0);
        let record = ResponseRecord::with_temperature(110);
        assert_eq!(translate(&machine, &frame, &record), " B:110");
    }

    #[test]
    fn test_target_temperatures_share_one_format() {
        let machine = Machine::default();
        let record = ResponseRecord::with_temperature(230);
        for q in [
            query::EXTRUDER_TARGET_TEMPERATURE,
            query::PLATFORM_TARGET_TEMPERATURE,
        ] {
            let frame = tool_query_frame(q, 0);
            assert_eq!(translate(&machine, &frame, &record), " /230");
        }
    }

    #[test]
    fn test_silent_queries_emit_nothing() {
        let machine = Machine::default();
        let record = ResponseRecord::with_temperature(170);
        for q in [
            query::FIRMWARE_VERSION,
            query::EXTRUDER_READY,
            query::PLATFORM_READY,
            query::EXTRUDER_STATUS,
            query::PID_STATE,
            99, // unrecognized
        ] {
            let frame = tool_query_frame(q, 0);
            assert_eq!(translate(&machine, &frame, &record), "");
        }
    }

    #[test]
    fn test_extended_position_scaling() {
        let mut machine = Machine::default();
        machine.x.steps_per_mm = 100.0;
        machine.y.steps_per_mm = 100.0;
        machine.z.steps_per_mm = 400.0;
        machine.a.steps_per_mm = 1.0;
        machine.b.steps_per_mm = 1.0;

        let frame = position_frame();
        let record = ResponseRecord::with_position(StepPosition::new(2000, 2000, 1000, 0, 0));
        assert_eq!(
            translate(&machine, &frame, &record),
            " X:20.00 Y:20.00 Z:2.50 A:0.00 B:0.00"
        );
    }

    #[test]
    fn test_unknown_opcode_emits_nothing() {
        let machine = Machine::default();
        let frame = CommandFrame::from_bytes(vec![0xd5, 0x01, 133]);
        let record = ResponseRecord::default();
        assert_eq!(translate(&machine, &frame, &record), "");
    }

    #[test]
    fn test_full_accumulator_drops_fragment() {
        let machine = Machine::default();
        let frame = tool_query_frame(query::PLATFORM_TEMPERATURE, 0);
        let record = ResponseRecord::with_temperature(110);

        let mut reply = ReplyAccumulator::with_capacity(2);
        reply.push("ok");
        translate_response(&machine, &frame, &record, &mut reply);
        assert_eq!(reply.text(), "ok");
    }

    #[test]
    fn test_sink_routes_through_shared_reply() {
        let machine = Machine::preset("r2x").unwrap();
        let mut reply = ReplyAccumulator::new();
        reply.push("ok");
        {
            let mut sink = ReplyTranslator::new(&machine, &mut reply);
            let record = ResponseRecord::with_temperature(200);
            sink.on_response(&tool_query_frame(query::EXTRUDER_TEMPERATURE, 0), &record);
            sink.on_response(&tool_query_frame(query::PLATFORM_TEMPERATURE, 0), &record);
        }
        assert_eq!(reply.text(), "ok T0:200 B:200");
    }
}
